//! Source-located diagnostics for rejected expressions
//!
//! Parse errors convert into a [`Diagnostic`] via
//! [`ParseError::to_diagnostic`](crate::parser::ParseError::to_diagnostic);
//! [`DiagnosticFormatter`] renders them as text, JSON or a single line.

pub mod builder;
pub mod diagnostic;
pub mod formatter;

pub use builder::DiagnosticBuilder;
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Span};
pub use formatter::{DiagnosticFormatter, Format};
