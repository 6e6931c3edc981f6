//! EDM model provider interface
//!
//! The parser consumes metadata read-only through these traits. Any metadata
//! source (a CSDL document, generated code, the in-memory [`Schema`]) can be
//! plugged in by implementing them.
//!
//! [`Schema`]: super::schema::Schema

use super::types::{EdmMultiplicity, EdmType, QualifiedName, StructuralKind};
use std::fmt::Debug;

/// A declared property of a structural type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdmProperty {
    /// Property name as it appears in expressions
    pub name: String,
    /// Declared type (simple, complex or the navigation target entity)
    pub edm_type: EdmType,
    /// Multiplicity; navigation properties to collections are `Many`
    pub multiplicity: EdmMultiplicity,
}

impl EdmProperty {
    /// Create a property with multiplicity `One`
    pub fn new(name: impl Into<String>, edm_type: impl Into<EdmType>) -> Self {
        Self {
            name: name.into(),
            edm_type: edm_type.into(),
            multiplicity: EdmMultiplicity::One,
        }
    }

    /// Set the multiplicity
    pub fn with_multiplicity(mut self, multiplicity: EdmMultiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }
}

/// Entity or complex type as seen by the parser
pub trait EdmStructuralType: Send + Sync + Debug {
    /// Qualified type name
    fn qualified_name(&self) -> &QualifiedName;

    /// Entity or complex
    fn kind(&self) -> StructuralKind;

    /// Look up a property by name
    fn property(&self, name: &str) -> Option<&EdmProperty>;

    /// This type as an [`EdmType`]
    fn as_edm_type(&self) -> EdmType {
        match self.kind() {
            StructuralKind::Entity => EdmType::Entity(self.qualified_name().clone()),
            StructuralKind::Complex => EdmType::Complex(self.qualified_name().clone()),
        }
    }
}

/// Source of structural type metadata
pub trait EdmModel: Send + Sync + Debug {
    /// Look up an entity or complex type by its qualified name
    fn structural_type(&self, name: &QualifiedName) -> Option<&dyn EdmStructuralType>;
}
