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

//! Operator and method registry
//!
//! The tables are built once on first use and are read-only afterwards, so
//! lookups from concurrent parses need no locking.

pub mod method;
pub mod operator;
pub mod signature;

pub use method::InfoMethod;
pub use operator::{InfoBinaryOperator, InfoUnaryOperator};
pub use signature::{ParameterSet, ParameterSetCombination, ParameterType};

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

static REGISTRY: Lazy<OperatorRegistry> = Lazy::new(OperatorRegistry::build);

/// Get the process-wide registry
pub fn registry() -> &'static OperatorRegistry {
    &REGISTRY
}

/// Lookup tables keyed by URI literal
#[derive(Debug)]
pub struct OperatorRegistry {
    binary: FxHashMap<&'static str, InfoBinaryOperator>,
    unary: FxHashMap<&'static str, InfoUnaryOperator>,
    methods: FxHashMap<&'static str, InfoMethod>,
}

impl OperatorRegistry {
    fn build() -> Self {
        let binary = operator::binary_operators()
            .into_iter()
            .map(|info| (info.syntax, info))
            .collect();
        let unary = operator::unary_operators()
            .into_iter()
            .map(|info| (info.syntax, info))
            .collect();
        let methods = method::methods()
            .into_iter()
            .map(|info| (info.syntax, info))
            .collect();

        log::debug!("operator registry initialized");
        Self {
            binary,
            unary,
            methods,
        }
    }

    /// Binary operator by URI literal
    pub fn lookup_binary(&self, literal: &str) -> Option<&InfoBinaryOperator> {
        self.binary.get(literal)
    }

    /// Unary operator by URI literal
    pub fn lookup_unary(&self, literal: &str) -> Option<&InfoUnaryOperator> {
        self.unary.get(literal)
    }

    /// Method by name; only a name followed by `(` denotes a method call
    pub fn lookup_method(&self, literal: &str, next_is_open_paren: bool) -> Option<&InfoMethod> {
        if !next_is_open_paren {
            return None;
        }
        self.methods.get(literal)
    }

    /// All method names
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.methods.keys().copied()
    }
}
