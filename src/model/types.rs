//! EDM type system used by the expression parser
//!
//! Simple types are identified by [`EdmSimpleTypeKind`]; structural types
//! (entity and complex types) are referenced by their qualified name and
//! resolved through an [`EdmModel`](super::provider::EdmModel).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical EDM simple type kinds
///
/// `Null` is the pseudo type of the `null` literal. It never appears as the
/// type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdmSimpleTypeKind {
    /// Edm.Binary
    Binary,
    /// Edm.Boolean
    Boolean,
    /// Edm.Byte (unsigned 8 bit)
    Byte,
    /// Edm.DateTime
    DateTime,
    /// Edm.DateTimeOffset
    DateTimeOffset,
    /// Edm.Decimal
    Decimal,
    /// Edm.Double
    Double,
    /// Edm.Guid
    Guid,
    /// Edm.Int16
    Int16,
    /// Edm.Int32
    Int32,
    /// Edm.Int64
    Int64,
    /// Edm.SByte (signed 8 bit)
    SByte,
    /// Edm.Single
    Single,
    /// Edm.String
    String,
    /// Edm.Time
    Time,
    /// Type of the `null` literal
    Null,
}

impl EdmSimpleTypeKind {
    /// All kinds that can be the declared type of a property
    pub const ALL: [EdmSimpleTypeKind; 15] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::DateTime,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::String,
        Self::Time,
    ];

    /// Numeric kinds ordered from the narrowest to the widest
    ///
    /// Signature tables are built in this order so that the first promoted
    /// match is the narrowest common type.
    pub const NUMERIC: [EdmSimpleTypeKind; 8] = [
        Self::SByte,
        Self::Byte,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Single,
        Self::Double,
        Self::Decimal,
    ];

    /// Qualified EDM name, e.g. `Edm.Int32`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "Edm.Binary",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::DateTime => "Edm.DateTime",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Decimal => "Edm.Decimal",
            Self::Double => "Edm.Double",
            Self::Guid => "Edm.Guid",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::SByte => "Edm.SByte",
            Self::Single => "Edm.Single",
            Self::String => "Edm.String",
            Self::Time => "Edm.Time",
            Self::Null => "Null",
        }
    }

    /// Resolve a qualified EDM name (`Edm.String`) to its kind
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "Null" {
            return Some(Self::Null);
        }
        let short = name.strip_prefix("Edm.")?;
        Self::ALL
            .iter()
            .copied()
            .find(|kind| &kind.name()[4..] == short)
    }

    /// Check if this is an integral kind
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::SByte | Self::Byte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    /// Check if this is a numeric kind
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Self::Single | Self::Double | Self::Decimal)
    }

    /// Check whether a value of kind `actual` may be promoted to this kind
    ///
    /// Every kind is compatible with itself. Promotion only widens numbers.
    pub fn is_compatible(self, actual: EdmSimpleTypeKind) -> bool {
        if self == actual {
            return true;
        }
        match self {
            Self::Int16 => matches!(actual, Self::SByte | Self::Byte),
            Self::Int32 => matches!(actual, Self::SByte | Self::Byte | Self::Int16),
            Self::Int64 => matches!(
                actual,
                Self::SByte | Self::Byte | Self::Int16 | Self::Int32
            ),
            Self::Single => actual.is_integer(),
            Self::Double => actual.is_integer() || actual == Self::Single,
            Self::Decimal => actual.is_integer() || matches!(actual, Self::Single | Self::Double),
            _ => false,
        }
    }
}

impl fmt::Display for EdmSimpleTypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Namespace qualified name of a structural type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Schema namespace (may be empty)
    pub namespace: String,
    /// Unqualified type name
    pub name: String,
}

impl QualifiedName {
    /// Create a new qualified name
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

/// Kind of a structural type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructuralKind {
    /// Entity type (has a key, reachable through navigation properties)
    #[default]
    Entity,
    /// Complex type (value object nested in an entity)
    Complex,
}

/// Coarse classification of an [`EdmType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdmTypeKind {
    /// Simple (primitive) type
    Simple,
    /// Entity type
    Entity,
    /// Complex type
    Complex,
}

/// Resolved EDM type of an expression node or property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmType {
    /// Simple type
    Simple(EdmSimpleTypeKind),
    /// Entity type
    Entity(QualifiedName),
    /// Complex type
    Complex(QualifiedName),
}

impl EdmType {
    /// Edm.Boolean
    pub const BOOLEAN: EdmType = EdmType::Simple(EdmSimpleTypeKind::Boolean);
    /// The `null` pseudo type
    pub const NULL: EdmType = EdmType::Simple(EdmSimpleTypeKind::Null);

    /// Classify this type
    pub fn kind(&self) -> EdmTypeKind {
        match self {
            EdmType::Simple(_) => EdmTypeKind::Simple,
            EdmType::Entity(_) => EdmTypeKind::Entity,
            EdmType::Complex(_) => EdmTypeKind::Complex,
        }
    }

    /// Simple kind, if this is a simple type
    pub fn as_simple(&self) -> Option<EdmSimpleTypeKind> {
        match self {
            EdmType::Simple(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Qualified name, if this is a structural type
    pub fn structural_name(&self) -> Option<&QualifiedName> {
        match self {
            EdmType::Entity(name) | EdmType::Complex(name) => Some(name),
            EdmType::Simple(_) => None,
        }
    }

    /// Check if this is an entity or complex type
    pub fn is_structural(&self) -> bool {
        !matches!(self, EdmType::Simple(_))
    }

    /// Check if this is the `null` pseudo type
    pub fn is_null(&self) -> bool {
        matches!(self, EdmType::Simple(EdmSimpleTypeKind::Null))
    }
}

impl From<EdmSimpleTypeKind> for EdmType {
    fn from(kind: EdmSimpleTypeKind) -> Self {
        EdmType::Simple(kind)
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdmType::Simple(kind) => write!(f, "{kind}"),
            EdmType::Entity(name) | EdmType::Complex(name) => write!(f, "{name}"),
        }
    }
}

/// Display helper for an optionally resolved type
pub fn type_display(edm_type: Option<&EdmType>) -> String {
    edm_type.map_or_else(|| "unknown".to_string(), ToString::to_string)
}

/// Cardinality of a property or navigation end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdmMultiplicity {
    /// `0..1`
    ZeroOrOne,
    /// `1`
    #[default]
    One,
    /// `*`
    Many,
}

impl fmt::Display for EdmMultiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdmMultiplicity::ZeroOrOne => f.write_str("0..1"),
            EdmMultiplicity::One => f.write_str("1"),
            EdmMultiplicity::Many => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_type_names() {
        assert_eq!(EdmSimpleTypeKind::Int32.name(), "Edm.Int32");
        assert_eq!(
            EdmSimpleTypeKind::from_name("Edm.DateTimeOffset"),
            Some(EdmSimpleTypeKind::DateTimeOffset)
        );
        assert_eq!(EdmSimpleTypeKind::from_name("Int32"), None);
        assert_eq!(EdmSimpleTypeKind::from_name("Edm.Nope"), None);
    }

    #[test]
    fn test_promotion_rules() {
        use EdmSimpleTypeKind::*;

        assert!(Int64.is_compatible(Int32));
        assert!(Int32.is_compatible(Byte));
        assert!(!Int32.is_compatible(Int64));
        assert!(Decimal.is_compatible(Double));
        assert!(Double.is_compatible(Single));
        assert!(!Single.is_compatible(Double));
        assert!(!String.is_compatible(Int32));
        assert!(!Int32.is_compatible(Null));
    }

    #[test]
    fn test_type_display() {
        let entity = EdmType::Entity(QualifiedName::new("RefScenario", "Employee"));
        assert_eq!(entity.to_string(), "RefScenario.Employee");
        assert_eq!(EdmType::BOOLEAN.to_string(), "Edm.Boolean");
        assert_eq!(type_display(None), "unknown");
    }
}
