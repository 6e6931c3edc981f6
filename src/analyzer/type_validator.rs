//! Operand and argument type validation

use crate::ast::BinaryOperator;
use crate::model::types::type_display;
use crate::model::{EdmType, EdmTypeKind};
use crate::parser::ParseErrorKind;
use crate::registry::{InfoBinaryOperator, InfoMethod, InfoUnaryOperator};

/// Matches actual types against registry signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeValidator {
    resource_bound: bool,
    allow_promotion: bool,
}

impl TypeValidator {
    /// `resource_bound` is false in untyped mode, where unresolved operands
    /// are accepted without a type
    pub fn new(resource_bound: bool, allow_promotion: bool) -> Self {
        Self {
            resource_bound,
            allow_promotion,
        }
    }

    fn skips(&self, types: &[Option<&EdmType>]) -> bool {
        !self.resource_bound && types.iter().any(Option::is_none)
    }

    /// Result type of a binary operation
    pub fn validate_binary(
        &self,
        info: &InfoBinaryOperator,
        left: Option<&EdmType>,
        right: Option<&EdmType>,
        position: usize,
    ) -> Result<Option<EdmType>, ParseErrorKind> {
        let actual = [left, right];
        if self.skips(&actual) {
            return Ok(None);
        }

        if matches!(info.operator, BinaryOperator::Eq | BinaryOperator::Ne)
            && is_entity_null_comparison(left, right)
        {
            return Ok(Some(EdmType::BOOLEAN));
        }

        info.combination
            .validate(&actual, self.allow_promotion)
            .map(Some)
            .ok_or_else(|| ParseErrorKind::InvalidOperandTypesForBinaryOperator {
                operator: info.syntax.to_string(),
                left_type: type_display(left),
                right_type: type_display(right),
                position,
            })
    }

    /// Result type of a unary operation
    pub fn validate_unary(
        &self,
        info: &InfoUnaryOperator,
        operand: Option<&EdmType>,
        position: usize,
    ) -> Result<Option<EdmType>, ParseErrorKind> {
        let actual = [operand];
        if self.skips(&actual) {
            return Ok(None);
        }

        info.combination
            .validate(&actual, self.allow_promotion)
            .map(Some)
            .ok_or_else(|| ParseErrorKind::InvalidOperandTypeForUnaryOperator {
                operator: info.syntax.to_string(),
                operand_type: type_display(operand),
                position,
            })
    }

    /// Result type of a method call
    pub fn validate_method(
        &self,
        info: &InfoMethod,
        args: &[Option<&EdmType>],
        position: usize,
    ) -> Result<Option<EdmType>, ParseErrorKind> {
        if !info.accepts_arity(args.len()) {
            return Err(ParseErrorKind::MethodWrongArgumentCount {
                method: info.syntax.to_string(),
                expected: info.arity_display(),
                actual: args.len(),
                position,
            });
        }
        if args.is_empty() || self.skips(args) {
            return Ok(None);
        }

        info.combination
            .validate(args, self.allow_promotion)
            .map(Some)
            .ok_or_else(|| ParseErrorKind::MethodWrongInputType {
                method: info.syntax.to_string(),
                actual: args
                    .iter()
                    .map(|arg| type_display(*arg))
                    .collect::<Vec<_>>()
                    .join(", "),
                position,
            })
    }
}

fn is_entity_null_comparison(left: Option<&EdmType>, right: Option<&EdmType>) -> bool {
    let is_entity = |t: Option<&EdmType>| t.is_some_and(|t| t.kind() == EdmTypeKind::Entity);
    let is_null = |t: Option<&EdmType>| t.is_some_and(EdmType::is_null);

    (is_entity(left) && is_null(right)) || (is_null(left) && is_entity(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdmSimpleTypeKind, QualifiedName};
    use crate::registry::registry;

    fn simple(kind: EdmSimpleTypeKind) -> EdmType {
        EdmType::Simple(kind)
    }

    #[test]
    fn test_binary_mismatch_names_both_types() {
        let validator = TypeValidator::new(false, true);
        let add = registry().lookup_binary("add").unwrap();
        let (text, int) = (simple(EdmSimpleTypeKind::String), simple(EdmSimpleTypeKind::Int32));

        let err = validator
            .validate_binary(add, Some(&text), Some(&int), 6)
            .unwrap_err();
        assert_eq!(
            err,
            ParseErrorKind::InvalidOperandTypesForBinaryOperator {
                operator: "add".to_string(),
                left_type: "Edm.String".to_string(),
                right_type: "Edm.Int32".to_string(),
                position: 6,
            }
        );
    }

    #[test]
    fn test_untyped_operand_skips_check_without_resource() {
        let eq = registry().lookup_binary("eq").unwrap();
        let text = simple(EdmSimpleTypeKind::String);

        let untyped = TypeValidator::new(false, true);
        assert_eq!(untyped.validate_binary(eq, None, Some(&text), 0), Ok(None));

        let bound = TypeValidator::new(true, true);
        assert!(bound.validate_binary(eq, None, Some(&text), 0).is_err());
    }

    #[test]
    fn test_entity_compared_with_null() {
        let validator = TypeValidator::new(true, true);
        let team = EdmType::Entity(QualifiedName::new("RefScenario", "Team"));
        let null = EdmType::NULL;

        for op in ["eq", "ne"] {
            let info = registry().lookup_binary(op).unwrap();
            assert_eq!(
                validator.validate_binary(info, Some(&null), Some(&team), 0),
                Ok(Some(EdmType::BOOLEAN))
            );
        }

        let lt = registry().lookup_binary("lt").unwrap();
        assert!(validator.validate_binary(lt, Some(&team), Some(&null), 0).is_err());
    }

    #[test]
    fn test_promotion_can_be_disabled() {
        let add = registry().lookup_binary("add").unwrap();
        let (int, long) = (simple(EdmSimpleTypeKind::Int32), simple(EdmSimpleTypeKind::Int64));

        let promoting = TypeValidator::new(true, true);
        assert_eq!(
            promoting.validate_binary(add, Some(&int), Some(&long), 0),
            Ok(Some(long.clone()))
        );

        let strict = TypeValidator::new(true, false);
        assert!(strict.validate_binary(add, Some(&int), Some(&long), 0).is_err());
    }

    #[test]
    fn test_method_arity_is_checked_first() {
        let validator = TypeValidator::new(false, true);
        let concat = registry().lookup_method("concat", true).unwrap();
        let text = simple(EdmSimpleTypeKind::String);

        let err = validator.validate_method(concat, &[Some(&text)], 0).unwrap_err();
        assert!(matches!(
            err,
            ParseErrorKind::MethodWrongArgumentCount { actual: 1, ref expected, .. } if expected == "2..*"
        ));

        let int = simple(EdmSimpleTypeKind::Int32);
        let err = validator
            .validate_method(concat, &[Some(&text), Some(&int)], 0)
            .unwrap_err();
        assert!(matches!(
            err,
            ParseErrorKind::MethodWrongInputType { ref actual, .. } if actual == "Edm.String, Edm.Int32"
        ));
    }

    #[test]
    fn test_unary_operand_type() {
        let validator = TypeValidator::new(true, true);
        let not = registry().lookup_unary("not").unwrap();
        let int = simple(EdmSimpleTypeKind::Int32);

        let err = validator.validate_unary(not, Some(&int), 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operator 'not' incompatible with operand type 'Edm.Int32' at position 3"
        );
    }
}
