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

//! Type validation and property path resolution
//!
//! Both run interleaved with tree construction: the parser calls into this
//! module for every node it builds, so a type error aborts parsing at the
//! first offending node.

pub mod property_resolver;
pub mod type_validator;

pub use property_resolver::{MemberSource, resolve_property};
pub use type_validator::TypeValidator;

use crate::model::{EdmModel, EdmStructuralType, QualifiedName};
use crate::parser::ParseErrorKind;

/// Metadata against which property names are resolved
#[derive(Debug, Clone, Copy)]
pub struct ResourceContext<'m> {
    model: &'m dyn EdmModel,
    entity_type: &'m dyn EdmStructuralType,
}

impl<'m> ResourceContext<'m> {
    /// Bind an entity type of `model`
    pub fn new(model: &'m dyn EdmModel, entity_type: &'m dyn EdmStructuralType) -> Self {
        Self { model, entity_type }
    }

    /// Look up the resource entity type by name
    pub fn for_type(model: &'m dyn EdmModel, name: &QualifiedName) -> Result<Self, ParseErrorKind> {
        let entity_type = model
            .structural_type(name)
            .ok_or_else(|| ParseErrorKind::EdmAccess {
                type_name: name.to_string(),
                position: 0,
            })?;
        Ok(Self::new(model, entity_type))
    }

    /// Metadata source
    pub fn model(&self) -> &'m dyn EdmModel {
        self.model
    }

    /// Resource entity type
    pub fn entity_type(&self) -> &'m dyn EdmStructuralType {
        self.entity_type
    }

    /// Resolve a referenced structural type
    pub(crate) fn structural_type(
        &self,
        name: &QualifiedName,
        position: usize,
    ) -> Result<&'m dyn EdmStructuralType, ParseErrorKind> {
        self.model
            .structural_type(name)
            .ok_or_else(|| ParseErrorKind::EdmAccess {
                type_name: name.to_string(),
                position,
            })
    }
}
