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

//! Core diagnostic types

use serde::Serialize;
use std::fmt;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note
    #[default]
    Info,
    /// May indicate a problem but does not reject the expression
    Warning,
    /// Rejects the expression
    Error,
}

/// Diagnostic error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    // Lexical errors
    /// Character that starts no token
    UnknownCharacter,
    /// String literal without closing quote
    UnterminatedString,
    /// Literal whose text does not parse as its type
    MalformedLiteral,

    // Syntax errors
    /// Token that cannot appear here
    UnexpectedToken,
    /// Missing operand or argument
    ExpressionExpected,
    /// `(` without `)`
    MissingClosingParenthesis,
    /// Method argument not followed by `,` or `)`
    CommaOrClosingParenthesisExpected,
    /// Tokens left after a complete expression
    TrailingToken,
    /// Call of a name that is not a method
    UnknownMethod,
    /// Unknown sort order keyword
    InvalidSortOrder,

    // Type errors
    /// No operator signature accepts the operand types
    InvalidOperandTypes,
    /// No method signature accepts the argument types
    InvalidArgumentTypes,
    /// Expression has the wrong result type
    TypeExpected,

    // Metadata errors
    /// Wrong number of method arguments
    InvalidArity,
    /// Unknown property
    PropertyNotFound,
    /// Collection-valued property used as a value
    InvalidMultiplicity,
    /// `/` applied to something that is not a property path
    LeftSideNotAProperty,
    /// `/` applied to a property of simple type
    LeftSideNotStructural,
    /// Metadata lookup failed
    MetadataAccess,
}

impl DiagnosticCode {
    /// Stable code string such as `E001`
    pub fn code_string(&self) -> &'static str {
        match self {
            DiagnosticCode::UnknownCharacter => "E001",
            DiagnosticCode::UnterminatedString => "E002",
            DiagnosticCode::MalformedLiteral => "E003",
            DiagnosticCode::UnexpectedToken => "E010",
            DiagnosticCode::ExpressionExpected => "E011",
            DiagnosticCode::MissingClosingParenthesis => "E012",
            DiagnosticCode::CommaOrClosingParenthesisExpected => "E013",
            DiagnosticCode::TrailingToken => "E014",
            DiagnosticCode::UnknownMethod => "E015",
            DiagnosticCode::InvalidSortOrder => "E016",
            DiagnosticCode::InvalidOperandTypes => "E100",
            DiagnosticCode::InvalidArgumentTypes => "E101",
            DiagnosticCode::TypeExpected => "E102",
            DiagnosticCode::InvalidArity => "E200",
            DiagnosticCode::PropertyNotFound => "E201",
            DiagnosticCode::InvalidMultiplicity => "E202",
            DiagnosticCode::LeftSideNotAProperty => "E203",
            DiagnosticCode::LeftSideNotStructural => "E204",
            DiagnosticCode::MetadataAccess => "E205",
        }
    }

    /// Short contextual help
    pub fn help(&self) -> Option<&'static str> {
        match self {
            DiagnosticCode::UnknownMethod => {
                Some("Check the method name; only OData v2 methods are supported")
            }
            DiagnosticCode::PropertyNotFound => {
                Some("Check the property name against the entity type")
            }
            DiagnosticCode::InvalidMultiplicity => {
                Some("Navigate from a collection with '/' before using it")
            }
            DiagnosticCode::InvalidArity => {
                Some("Check the number of arguments the method accepts")
            }
            DiagnosticCode::TypeExpected => Some("A $filter expression must be boolean"),
            _ => None,
        }
    }
}

/// Byte range in the expression string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Start offset
    pub start: usize,
    /// End offset, exclusive
    pub end: usize,
}

impl Span {
    /// Create a span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check for an empty span
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity of the diagnostic
    pub severity: Severity,
    /// Error code
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Offending part of the expression
    pub span: Span,
    /// Expression the span refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    /// Contextual help
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(code: DiagnosticCode, severity: Severity, message: String, span: Span) -> Self {
        Self {
            severity,
            code,
            message,
            span,
            source_text: None,
            help: code.help().map(str::to_string),
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Get the diagnostic code as a string
    pub fn code_string(&self) -> &'static str {
        self.code.code_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticCode::UnknownCharacter => "unknown character",
            DiagnosticCode::UnterminatedString => "unterminated string literal",
            DiagnosticCode::MalformedLiteral => "malformed literal",
            DiagnosticCode::UnexpectedToken => "unexpected token",
            DiagnosticCode::ExpressionExpected => "expression expected",
            DiagnosticCode::MissingClosingParenthesis => "missing closing parenthesis",
            DiagnosticCode::CommaOrClosingParenthesisExpected => {
                "comma or closing parenthesis expected"
            }
            DiagnosticCode::TrailingToken => "trailing token",
            DiagnosticCode::UnknownMethod => "unknown method",
            DiagnosticCode::InvalidSortOrder => "invalid sort order",
            DiagnosticCode::InvalidOperandTypes => "invalid operand types",
            DiagnosticCode::InvalidArgumentTypes => "invalid argument types",
            DiagnosticCode::TypeExpected => "unexpected expression type",
            DiagnosticCode::InvalidArity => "invalid number of arguments",
            DiagnosticCode::PropertyNotFound => "property not found",
            DiagnosticCode::InvalidMultiplicity => "invalid multiplicity",
            DiagnosticCode::LeftSideNotAProperty => "left side is not a property",
            DiagnosticCode::LeftSideNotStructural => "left side is not structural",
            DiagnosticCode::MetadataAccess => "metadata access error",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            match self.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN",
                Severity::Info => "INFO",
            },
            self.code,
            self.message
        )
    }
}
