//! Method descriptors and their signature tables

use super::signature::{ParameterSet, ParameterSetCombination};
use crate::ast::MethodOperator;
use crate::model::EdmSimpleTypeKind;

use EdmSimpleTypeKind::{
    Boolean, DateTime, DateTimeOffset, Decimal, Double, Int32, String as EdmString, Time,
};

/// Descriptor of a built-in method
#[derive(Debug, Clone)]
pub struct InfoMethod {
    /// Method identity
    pub method: MethodOperator,
    /// URI literal
    pub syntax: &'static str,
    /// Minimum number of arguments
    pub min_params: usize,
    /// Maximum number of arguments (None for variadic)
    pub max_params: Option<usize>,
    /// Valid argument signatures
    pub combination: ParameterSetCombination,
}

impl InfoMethod {
    fn new(
        method: MethodOperator,
        min_params: usize,
        max_params: Option<usize>,
        sets: Vec<ParameterSet>,
    ) -> Self {
        Self {
            method,
            syntax: method.uri_literal(),
            min_params,
            max_params,
            combination: ParameterSetCombination::Sets(sets),
        }
    }

    /// Check whether `count` arguments are acceptable
    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.min_params && self.max_params.is_none_or(|max| count <= max)
    }

    /// Human readable arity, e.g. `1..3` or `2..*`
    pub fn arity_display(&self) -> String {
        match self.max_params {
            Some(max) if max == self.min_params => max.to_string(),
            Some(max) => format!("{}..{max}", self.min_params),
            None => format!("{}..*", self.min_params),
        }
    }
}

fn signature(method: MethodOperator) -> (usize, Option<usize>, Vec<ParameterSet>) {
    use MethodOperator::*;

    match method {
        EndsWith | StartsWith | SubstringOf => (
            2,
            Some(2),
            vec![ParameterSet::new(Boolean, &[EdmString, EdmString])],
        ),
        IndexOf => (2, Some(2), vec![ParameterSet::new(Int32, &[EdmString, EdmString])]),
        ToLower | ToUpper | Trim => (1, Some(1), vec![ParameterSet::new(EdmString, &[EdmString])]),
        Substring => (
            1,
            Some(3),
            vec![
                ParameterSet::new(EdmString, &[EdmString]),
                ParameterSet::new(EdmString, &[EdmString, Int32]),
                ParameterSet::new(EdmString, &[EdmString, Int32, Int32]),
            ],
        ),
        Concat => (
            2,
            None,
            vec![ParameterSet::new(EdmString, &[EdmString, EdmString]).with_further_type(EdmString)],
        ),
        Length => (1, Some(1), vec![ParameterSet::new(Int32, &[EdmString])]),
        Year | Month | Day => (
            1,
            Some(1),
            vec![
                ParameterSet::new(Int32, &[DateTime]),
                ParameterSet::new(Int32, &[DateTimeOffset]),
            ],
        ),
        Hour | Minute | Second => (
            1,
            Some(1),
            vec![
                ParameterSet::new(Int32, &[DateTime]),
                ParameterSet::new(Int32, &[DateTimeOffset]),
                ParameterSet::new(Int32, &[Time]),
            ],
        ),
        Round | Floor | Ceiling => (
            1,
            Some(1),
            vec![
                ParameterSet::new(Decimal, &[Decimal]),
                ParameterSet::new(Double, &[Double]),
            ],
        ),
    }
}

/// Descriptors of every built-in method
pub fn methods() -> Vec<InfoMethod> {
    MethodOperator::ALL
        .into_iter()
        .map(|method| {
            let (min, max, sets) = signature(method);
            InfoMethod::new(method, min, max, sets)
        })
        .collect()
}
