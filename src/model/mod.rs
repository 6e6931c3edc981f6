//! Entity data model: type system, metadata provider interface, in-memory
//! schema and literal values

pub mod provider;
pub mod schema;
pub mod types;
pub mod value;

pub use provider::{EdmModel, EdmProperty, EdmStructuralType};
pub use schema::{Schema, SchemaError, StructuralTypeDef};
pub use types::{
    EdmMultiplicity, EdmSimpleTypeKind, EdmType, EdmTypeKind, QualifiedName, StructuralKind,
};
pub use value::LiteralValue;
