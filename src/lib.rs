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

//! OData v2 `$filter` and `$orderby` parser
//!
//! Expressions are tokenized, parsed into a typed expression tree and
//! validated against an EDM schema while the tree is built.
//!
//! ```
//! use odata_filter::analyzer::ResourceContext;
//! use odata_filter::model::{EdmSimpleTypeKind, EdmType, Schema};
//! use odata_filter::parser::FilterParser;
//!
//! let mut schema = Schema::new("RefScenario");
//! schema
//!     .add_entity_type("Employee")
//!     .simple("EmployeeName", EdmSimpleTypeKind::String)
//!     .simple("Age", EdmSimpleTypeKind::Int32);
//!
//! let employee = schema.entity_type("Employee").unwrap();
//! let parser = FilterParser::with_resource(ResourceContext::new(&schema, employee));
//!
//! let filter = parser.parse_filter("Age gt 30 and startswith(EmployeeName, 'W')").unwrap();
//! assert_eq!(filter.edm_type(), Some(&EdmType::BOOLEAN));
//!
//! let err = parser.parse_filter("Salary gt 30").unwrap_err();
//! assert_eq!(err.position(), 0);
//! ```

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod model;
pub mod parser;
pub mod registry;

pub use analyzer::ResourceContext;
pub use ast::{ExpressionNode, FilterExpression, OrderByExpression};
pub use config::ParserConfig;
pub use diagnostics::{Diagnostic, DiagnosticFormatter, Format};
pub use model::{EdmType, Schema};
pub use parser::{FilterParser, ParseError, ParseErrorKind, ParseResult, parse_filter, parse_order_by};
