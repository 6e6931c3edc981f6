//! Parameter signatures for operator and method type checking

use crate::model::{EdmSimpleTypeKind, EdmType};
use smallvec::SmallVec;
use std::fmt;

/// Declared type of a parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Matches any actual type, including an unresolved one
    Any,
    /// Matches the given kind, or a kind promotable to it
    Simple(EdmSimpleTypeKind),
}

impl ParameterType {
    fn accepts(self, actual: Option<&EdmType>, allow_promotion: bool) -> bool {
        let expected = match self {
            ParameterType::Any => return true,
            ParameterType::Simple(kind) => kind,
        };
        match actual.and_then(EdmType::as_simple) {
            Some(kind) if kind == expected => true,
            Some(kind) => allow_promotion && expected.is_compatible(kind),
            None => false,
        }
    }
}

impl From<EdmSimpleTypeKind> for ParameterType {
    fn from(kind: EdmSimpleTypeKind) -> Self {
        ParameterType::Simple(kind)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Any => f.write_str("*"),
            ParameterType::Simple(kind) => write!(f, "{kind}"),
        }
    }
}

/// One valid signature: return type, parameter types and an optional type
/// for every further (variadic) parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSet {
    /// Result type
    pub return_type: EdmSimpleTypeKind,
    /// Fixed parameters
    pub parameters: SmallVec<[ParameterType; 3]>,
    /// Type of parameters beyond the fixed ones
    pub further_type: Option<ParameterType>,
}

impl ParameterSet {
    /// Create a fixed-arity signature
    pub fn new(return_type: EdmSimpleTypeKind, parameters: &[EdmSimpleTypeKind]) -> Self {
        Self {
            return_type,
            parameters: parameters.iter().copied().map(ParameterType::from).collect(),
            further_type: None,
        }
    }

    /// Accept any number of further parameters of the given type
    pub fn with_further_type(mut self, further_type: EdmSimpleTypeKind) -> Self {
        self.further_type = Some(further_type.into());
        self
    }

    /// Check the actual parameter types against this signature
    pub fn matches(&self, actual: &[Option<&EdmType>], allow_promotion: bool) -> bool {
        if actual.len() < self.parameters.len() {
            return false;
        }
        if actual.len() > self.parameters.len() && self.further_type.is_none() {
            return false;
        }

        actual.iter().enumerate().all(|(index, actual_type)| {
            let declared = self
                .parameters
                .get(index)
                .copied()
                .or(self.further_type);
            declared.is_some_and(|declared| declared.accepts(*actual_type, allow_promotion))
        })
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        if let Some(further) = self.further_type {
            parameters.push(format!("{further}..."));
        }
        write!(f, "({}) -> {}", parameters.join(", "), self.return_type)
    }
}

/// Ordered alternative signatures of an operator or method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSetCombination {
    /// Explicit list of signatures, tried in order
    Sets(Vec<ParameterSet>),
    /// The result has the type of the last parameter (member access)
    ReturnTypeEqLastParameter,
}

impl ParameterSetCombination {
    /// Find the result type for the actual parameter types
    ///
    /// Signatures are first matched exactly; if none matches and promotion is
    /// allowed, a second pass accepts promotable numeric kinds. `None` means
    /// no signature accepts the parameters.
    pub fn validate(&self, actual: &[Option<&EdmType>], allow_promotion: bool) -> Option<EdmType> {
        match self {
            ParameterSetCombination::ReturnTypeEqLastParameter => actual.last().copied().flatten().cloned(),
            ParameterSetCombination::Sets(sets) => {
                let exact = sets.iter().find(|set| set.matches(actual, false));
                let found = match exact {
                    Some(set) => Some(set),
                    None if allow_promotion => sets.iter().find(|set| set.matches(actual, true)),
                    None => None,
                };
                found.map(|set| EdmType::Simple(set.return_type))
            }
        }
    }

    /// Declared signatures (empty for the member combination)
    pub fn sets(&self) -> &[ParameterSet] {
        match self {
            ParameterSetCombination::Sets(sets) => sets,
            ParameterSetCombination::ReturnTypeEqLastParameter => &[],
        }
    }
}
