//! Property path resolution against structural types

use super::ResourceContext;
use crate::ast::ExpressionNode;
use crate::model::types::type_display;
use crate::model::{EdmMultiplicity, EdmProperty, EdmStructuralType};
use crate::parser::ParseErrorKind;

/// Left side of a `/` whose right side is being resolved
#[derive(Debug, Clone, Copy)]
pub struct MemberSource<'a> {
    /// Node on the left of `/`
    pub node: &'a ExpressionNode,
    /// Offset of the `/` token
    pub position: usize,
}

/// Resolve a property name in its structural scope
///
/// Without `member` the name is looked up in the resource entity type;
/// otherwise in the type of the member source, which must be a property path
/// of entity or complex type. `followed_by_member` tells whether the next
/// token is `/`, which is required for collection-valued properties.
pub fn resolve_property(
    context: &ResourceContext<'_>,
    name: &str,
    position: usize,
    member: Option<MemberSource<'_>>,
    followed_by_member: bool,
) -> Result<EdmProperty, ParseErrorKind> {
    let scope: &dyn EdmStructuralType = match member {
        None => context.entity_type(),
        Some(source) => {
            if !source.node.is_property_path() {
                return Err(ParseErrorKind::LeftSideNotAProperty {
                    position: source.position,
                });
            }
            let structural_name = source.node.edm_type().and_then(|t| t.structural_name());
            match structural_name {
                Some(type_name) => context.structural_type(type_name, position)?,
                None => {
                    return Err(ParseErrorKind::LeftSideNotStructuralType {
                        type_name: type_display(source.node.edm_type()),
                        property: name.to_string(),
                        position: source.position,
                    });
                }
            }
        }
    };

    let property = scope
        .property(name)
        .ok_or_else(|| ParseErrorKind::PropertyNotFoundInType {
            property: name.to_string(),
            type_name: scope.qualified_name().to_string(),
            position,
        })?;

    if property.multiplicity == EdmMultiplicity::Many && !followed_by_member {
        return Err(ParseErrorKind::InvalidMultiplicity {
            property: name.to_string(),
            position,
        });
    }

    log::trace!(
        "resolved property '{}' in {} as {}",
        name,
        scope.qualified_name(),
        property.edm_type
    );
    Ok(property.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdmSimpleTypeKind, EdmType, LiteralValue, QualifiedName, Schema};

    fn schema() -> Schema {
        let mut schema = Schema::new("RefScenario");
        schema
            .add_entity_type("Employee")
            .simple("Age", EdmSimpleTypeKind::Int32)
            .complex("Location", "c_Location")
            .navigation("ne_Team", "Team", EdmMultiplicity::One);
        schema
            .add_entity_type("Team")
            .simple("Name", EdmSimpleTypeKind::String)
            .navigation("nt_Employees", "Employee", EdmMultiplicity::Many);
        schema
            .add_complex_type("c_Location")
            .simple("Country", EdmSimpleTypeKind::String);
        schema
    }

    fn typed_property(name: &str, edm_type: EdmType) -> ExpressionNode {
        let mut node = ExpressionNode::property(name, 0);
        node.set_edm_type(Some(edm_type));
        node
    }

    #[test]
    fn test_resolve_in_resource_type() {
        let schema = schema();
        let context = ResourceContext::new(&schema, schema.entity_type("Employee").unwrap());

        let age = resolve_property(&context, "Age", 0, None, false).unwrap();
        assert_eq!(age.edm_type, EdmType::Simple(EdmSimpleTypeKind::Int32));

        let err = resolve_property(&context, "Salary", 4, None, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No property 'Salary' exists in type 'RefScenario.Employee' at position 4"
        );
    }

    #[test]
    fn test_resolve_in_member_source() {
        let schema = schema();
        let context = ResourceContext::new(&schema, schema.entity_type("Employee").unwrap());
        let location = typed_property(
            "Location",
            EdmType::Complex(QualifiedName::new("RefScenario", "c_Location")),
        );

        let source = MemberSource {
            node: &location,
            position: 8,
        };
        let country = resolve_property(&context, "Country", 9, Some(source), false).unwrap();
        assert_eq!(country.name, "Country");
    }

    #[test]
    fn test_member_source_must_be_structural_property() {
        let schema = schema();
        let context = ResourceContext::new(&schema, schema.entity_type("Employee").unwrap());

        let age = typed_property("Age", EdmType::Simple(EdmSimpleTypeKind::Int32));
        let err = resolve_property(
            &context,
            "X",
            4,
            Some(MemberSource {
                node: &age,
                position: 3,
            }),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ParseErrorKind::LeftSideNotStructuralType { position: 3, .. }));

        let literal = ExpressionNode::literal("'a'", LiteralValue::String("a".into()), 0);
        let err = resolve_property(
            &context,
            "X",
            4,
            Some(MemberSource {
                node: &literal,
                position: 3,
            }),
            false,
        )
        .unwrap_err();
        assert_eq!(err, ParseErrorKind::LeftSideNotAProperty { position: 3 });
    }

    #[test]
    fn test_collection_requires_member_access() {
        let schema = schema();
        let context = ResourceContext::new(&schema, schema.entity_type("Team").unwrap());

        let err = resolve_property(&context, "nt_Employees", 0, None, false).unwrap_err();
        assert!(matches!(err, ParseErrorKind::InvalidMultiplicity { .. }));
        assert!(resolve_property(&context, "nt_Employees", 0, None, true).is_ok());
    }

    #[test]
    fn test_missing_referenced_type_is_edm_access_error() {
        let mut schema = Schema::new("NS");
        schema
            .add_entity_type("A")
            .complex("Broken", "Missing");
        let context = ResourceContext::new(&schema, schema.entity_type("A").unwrap());
        let broken = typed_property("Broken", EdmType::Complex(QualifiedName::new("NS", "Missing")));

        let err = resolve_property(
            &context,
            "X",
            7,
            Some(MemberSource {
                node: &broken,
                position: 6,
            }),
            false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParseErrorKind::EdmAccess {
                type_name: "NS.Missing".to_string(),
                position: 7,
            }
        );
    }
}
