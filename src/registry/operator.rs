//! Operator descriptors and their signature tables

use super::signature::{ParameterSet, ParameterSetCombination};
use crate::ast::{BinaryOperator, OperatorCategory, UnaryOperator};
use crate::model::EdmSimpleTypeKind;

use EdmSimpleTypeKind::{
    Binary, Boolean, DateTime, DateTimeOffset, Guid, Null, String as EdmString, Time,
};

/// Descriptor of a binary operator
#[derive(Debug, Clone)]
pub struct InfoBinaryOperator {
    /// Operator identity
    pub operator: BinaryOperator,
    /// Category label
    pub category: OperatorCategory,
    /// URI literal
    pub syntax: &'static str,
    /// Binding priority
    pub priority: u8,
    /// Valid operand signatures
    pub combination: ParameterSetCombination,
}

impl InfoBinaryOperator {
    fn new(operator: BinaryOperator, combination: ParameterSetCombination) -> Self {
        Self {
            operator,
            category: operator.category(),
            syntax: operator.uri_literal(),
            priority: operator.priority(),
            combination,
        }
    }
}

/// Descriptor of a unary operator
#[derive(Debug, Clone)]
pub struct InfoUnaryOperator {
    pub operator: UnaryOperator,
    pub category: OperatorCategory,
    pub syntax: &'static str,
    pub combination: ParameterSetCombination,
}

impl InfoUnaryOperator {
    fn new(operator: UnaryOperator, combination: ParameterSetCombination) -> Self {
        Self {
            operator,
            category: operator.category(),
            syntax: operator.uri_literal(),
            combination,
        }
    }
}

/// Comparable non-numeric kinds
const COMPARABLE: [EdmSimpleTypeKind; 7] =
    [EdmString, Time, DateTime, DateTimeOffset, Guid, Binary, Boolean];

/// `(K; K, K)` for every kind, followed by the null mirrored variants
fn homogeneous_sets(
    kinds: impl IntoIterator<Item = EdmSimpleTypeKind> + Clone,
    return_type: impl Fn(EdmSimpleTypeKind) -> EdmSimpleTypeKind,
) -> Vec<ParameterSet> {
    let mut sets: Vec<ParameterSet> = kinds
        .clone()
        .into_iter()
        .map(|kind| ParameterSet::new(return_type(kind), &[kind, kind]))
        .collect();

    for kind in kinds {
        sets.push(ParameterSet::new(return_type(kind), &[kind, Null]));
        sets.push(ParameterSet::new(return_type(kind), &[Null, kind]));
    }
    sets
}

fn logical_combination() -> ParameterSetCombination {
    ParameterSetCombination::Sets(homogeneous_sets([Boolean], |_| Boolean))
}

fn arithmetic_combination() -> ParameterSetCombination {
    ParameterSetCombination::Sets(homogeneous_sets(EdmSimpleTypeKind::NUMERIC, |kind| kind))
}

fn relational_combination() -> ParameterSetCombination {
    let kinds = EdmSimpleTypeKind::NUMERIC.into_iter().chain(COMPARABLE);
    ParameterSetCombination::Sets(homogeneous_sets(kinds, |_| Boolean))
}

fn equality_combination() -> ParameterSetCombination {
    let kinds = EdmSimpleTypeKind::NUMERIC.into_iter().chain(COMPARABLE);
    let mut sets = homogeneous_sets(kinds, |_| Boolean);
    sets.push(ParameterSet::new(Boolean, &[Null, Null]));
    ParameterSetCombination::Sets(sets)
}

/// Descriptors of every binary operator
pub fn binary_operators() -> Vec<InfoBinaryOperator> {
    BinaryOperator::ALL
        .into_iter()
        .map(|operator| {
            let combination = match operator.category() {
                OperatorCategory::Logical => logical_combination(),
                OperatorCategory::Equality => equality_combination(),
                OperatorCategory::Relational => relational_combination(),
                OperatorCategory::Additive | OperatorCategory::Multiplicative => {
                    arithmetic_combination()
                }
                OperatorCategory::Member | OperatorCategory::Arithmetic => {
                    ParameterSetCombination::ReturnTypeEqLastParameter
                }
            };
            InfoBinaryOperator::new(operator, combination)
        })
        .collect()
}

/// Descriptors of every unary operator
pub fn unary_operators() -> Vec<InfoUnaryOperator> {
    let not = ParameterSetCombination::Sets(vec![
        ParameterSet::new(Boolean, &[Boolean]),
        ParameterSet::new(Boolean, &[Null]),
    ]);
    let minus = ParameterSetCombination::Sets(
        EdmSimpleTypeKind::NUMERIC
            .into_iter()
            .map(|kind| ParameterSet::new(kind, &[kind]))
            .chain(
                EdmSimpleTypeKind::NUMERIC
                    .into_iter()
                    .map(|kind| ParameterSet::new(kind, &[Null])),
            )
            .collect(),
    );

    vec![
        InfoUnaryOperator::new(UnaryOperator::Not, not),
        InfoUnaryOperator::new(UnaryOperator::Minus, minus),
    ]
}
