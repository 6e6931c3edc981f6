// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory EDM schema
//!
//! A [`Schema`] holds the entity and complex types of a single namespace. It
//! can be built programmatically:
//!
//! ```rust
//! use odata_filter::model::{EdmMultiplicity, EdmSimpleTypeKind, Schema};
//!
//! let mut schema = Schema::new("RefScenario");
//! schema
//!     .add_entity_type("Employee")
//!     .simple("EmployeeName", EdmSimpleTypeKind::String)
//!     .navigation("ne_Team", "Team", EdmMultiplicity::One);
//! schema
//!     .add_entity_type("Team")
//!     .simple("Name", EdmSimpleTypeKind::String);
//! ```
//!
//! or loaded from a JSON document, see [`Schema::from_json`].

use super::provider::{EdmModel, EdmProperty, EdmStructuralType};
use super::types::{EdmMultiplicity, EdmSimpleTypeKind, EdmType, QualifiedName, StructuralKind};
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a schema document
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not valid JSON or does not match the expected shape
    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// A property declares a type string that cannot be interpreted
    #[error("property '{owner}.{property}' has unknown type '{type_name}'")]
    UnknownType {
        /// Declaring type
        owner: String,
        /// Property name
        property: String,
        /// Offending type string
        type_name: String,
    },

    /// Two types share a name
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    /// A property references a structural type that is not declared
    #[error("property '{owner}.{property}' references undeclared type '{target}'")]
    UnresolvedReference {
        /// Declaring type
        owner: String,
        /// Property name
        property: String,
        /// Referenced type
        target: String,
    },
}

/// Entity or complex type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralTypeDef {
    name: QualifiedName,
    kind: StructuralKind,
    properties: IndexMap<String, EdmProperty>,
}

impl StructuralTypeDef {
    /// Create an empty type definition
    pub fn new(name: QualifiedName, kind: StructuralKind) -> Self {
        Self {
            name,
            kind,
            properties: IndexMap::new(),
        }
    }

    /// Add a property, replacing any previous property with the same name
    pub fn add_property(&mut self, property: EdmProperty) -> &mut Self {
        self.properties.insert(property.name.clone(), property);
        self
    }

    /// Add a simple typed property
    pub fn simple(&mut self, name: &str, kind: EdmSimpleTypeKind) -> &mut Self {
        self.add_property(EdmProperty::new(name, kind))
    }

    /// Add a complex typed property; `complex_type` lives in the same namespace
    pub fn complex(&mut self, name: &str, complex_type: &str) -> &mut Self {
        let target = QualifiedName::new(self.name.namespace.clone(), complex_type);
        self.add_property(EdmProperty::new(name, EdmType::Complex(target)))
    }

    /// Add a navigation property to an entity type of the same namespace
    pub fn navigation(
        &mut self,
        name: &str,
        target_entity: &str,
        multiplicity: EdmMultiplicity,
    ) -> &mut Self {
        let target = QualifiedName::new(self.name.namespace.clone(), target_entity);
        self.add_property(
            EdmProperty::new(name, EdmType::Entity(target)).with_multiplicity(multiplicity),
        )
    }

    /// Declared properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = &EdmProperty> {
        self.properties.values()
    }
}

impl EdmStructuralType for StructuralTypeDef {
    fn qualified_name(&self) -> &QualifiedName {
        &self.name
    }

    fn kind(&self) -> StructuralKind {
        self.kind
    }

    fn property(&self, name: &str) -> Option<&EdmProperty> {
        self.properties.get(name)
    }
}

/// Entity and complex types of one namespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    namespace: String,
    entity_types: IndexMap<String, StructuralTypeDef>,
    complex_types: IndexMap<String, StructuralTypeDef>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Schema namespace
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Add (or replace) an entity type and return it for further building
    pub fn add_entity_type(&mut self, name: &str) -> &mut StructuralTypeDef {
        let def = StructuralTypeDef::new(
            QualifiedName::new(self.namespace.clone(), name),
            StructuralKind::Entity,
        );
        self.entity_types.insert(name.to_string(), def);
        &mut self.entity_types[name]
    }

    /// Add (or replace) a complex type and return it for further building
    pub fn add_complex_type(&mut self, name: &str) -> &mut StructuralTypeDef {
        let def = StructuralTypeDef::new(
            QualifiedName::new(self.namespace.clone(), name),
            StructuralKind::Complex,
        );
        self.complex_types.insert(name.to_string(), def);
        &mut self.complex_types[name]
    }

    /// Entity type by unqualified name
    pub fn entity_type(&self, name: &str) -> Option<&StructuralTypeDef> {
        self.entity_types.get(name)
    }

    /// Complex type by unqualified name
    pub fn complex_type(&self, name: &str) -> Option<&StructuralTypeDef> {
        self.complex_types.get(name)
    }

    /// Entity type by unqualified or namespace qualified name
    pub fn resolve_entity_type(&self, name: &str) -> Option<&StructuralTypeDef> {
        match name.rsplit_once('.') {
            Some((namespace, short)) if namespace == self.namespace => self.entity_type(short),
            Some(_) => None,
            None => self.entity_type(name),
        }
    }

    /// Load a schema from its JSON representation
    ///
    /// ```json
    /// {
    ///   "namespace": "RefScenario",
    ///   "entity_types": [
    ///     { "name": "Employee", "properties": [
    ///       { "name": "Age", "type": "Edm.Int32" },
    ///       { "name": "Location", "type": "complex:c_Location" },
    ///       { "name": "ne_Team", "type": "entity:Team", "multiplicity": "zero_or_one" }
    ///     ] }
    ///   ],
    ///   "complex_types": [ { "name": "c_Location", "properties": [] } ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        document.into_schema()
    }

    fn contains(&self, name: &QualifiedName, kind: StructuralKind) -> bool {
        if name.namespace != self.namespace {
            return false;
        }
        match kind {
            StructuralKind::Entity => self.entity_types.contains_key(&name.name),
            StructuralKind::Complex => self.complex_types.contains_key(&name.name),
        }
    }
}

impl EdmModel for Schema {
    fn structural_type(&self, name: &QualifiedName) -> Option<&dyn EdmStructuralType> {
        if name.namespace != self.namespace {
            return None;
        }
        self.entity_types
            .get(&name.name)
            .or_else(|| self.complex_types.get(&name.name))
            .map(|def| def as &dyn EdmStructuralType)
    }
}

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    namespace: String,
    #[serde(default)]
    entity_types: Vec<TypeDocument>,
    #[serde(default)]
    complex_types: Vec<TypeDocument>,
}

#[derive(Debug, Deserialize)]
struct TypeDocument {
    name: String,
    #[serde(default)]
    properties: Vec<PropertyDocument>,
}

#[derive(Debug, Deserialize)]
struct PropertyDocument {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    multiplicity: EdmMultiplicity,
}

impl SchemaDocument {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new(self.namespace);

        for (documents, kind) in [
            (self.entity_types, StructuralKind::Entity),
            (self.complex_types, StructuralKind::Complex),
        ] {
            for document in documents {
                if schema.entity_types.contains_key(&document.name)
                    || schema.complex_types.contains_key(&document.name)
                {
                    return Err(SchemaError::DuplicateType(document.name));
                }

                let def = match kind {
                    StructuralKind::Entity => schema.add_entity_type(&document.name),
                    StructuralKind::Complex => schema.add_complex_type(&document.name),
                };
                let namespace = def.name.namespace.clone();
                for property in document.properties {
                    let edm_type = parse_type_name(&namespace, &property.type_name).ok_or_else(
                        || SchemaError::UnknownType {
                            owner: document.name.clone(),
                            property: property.name.clone(),
                            type_name: property.type_name.clone(),
                        },
                    )?;
                    def.add_property(
                        EdmProperty::new(property.name, edm_type)
                            .with_multiplicity(property.multiplicity),
                    );
                }
            }
        }

        schema.check_references()?;
        Ok(schema)
    }
}

impl Schema {
    fn check_references(&self) -> Result<(), SchemaError> {
        for def in self.entity_types.values().chain(self.complex_types.values()) {
            for property in def.properties() {
                let (target, kind) = match &property.edm_type {
                    EdmType::Entity(target) => (target, StructuralKind::Entity),
                    EdmType::Complex(target) => (target, StructuralKind::Complex),
                    EdmType::Simple(_) => continue,
                };
                if !self.contains(target, kind) {
                    return Err(SchemaError::UnresolvedReference {
                        owner: def.name.name.clone(),
                        property: property.name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Interpret `Edm.X`, `entity:Name` and `complex:Name` type strings
fn parse_type_name(namespace: &str, type_name: &str) -> Option<EdmType> {
    let qualify = |name: &str| match name.rsplit_once('.') {
        Some((ns, short)) => QualifiedName::new(ns, short),
        None => QualifiedName::new(namespace, name),
    };

    if let Some(name) = type_name.strip_prefix("entity:") {
        return Some(EdmType::Entity(qualify(name)));
    }
    if let Some(name) = type_name.strip_prefix("complex:") {
        return Some(EdmType::Complex(qualify(name)));
    }
    match EdmSimpleTypeKind::from_name(type_name)? {
        EdmSimpleTypeKind::Null => None,
        kind => Some(EdmType::Simple(kind)),
    }
}
