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

//! Parser error types

use crate::ast::ExpressionNode;
use crate::diagnostics::{Diagnostic, DiagnosticBuilder, DiagnosticCode};
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Lexical errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    /// Character that cannot start any token
    #[error("Unknown character '{character}' at position {position}")]
    UnknownCharacter {
        /// The offending character
        character: char,
        /// Offset of the character
        position: usize,
    },

    /// String literal without closing quote
    #[error("Unterminated string literal at position {position}")]
    UnterminatedStringLiteral {
        /// Offset of the opening quote
        position: usize,
    },

    /// Literal whose text does not denote a value of its type
    #[error("Malformed literal '{literal}' at position {position}")]
    MalformedLiteral {
        /// Literal text
        literal: String,
        /// Offset of the literal
        position: usize,
    },
}

impl TokenizerError {
    /// Offset of the error
    pub fn position(&self) -> usize {
        match self {
            TokenizerError::UnknownCharacter { position, .. }
            | TokenizerError::UnterminatedStringLiteral { position }
            | TokenizerError::MalformedLiteral { position, .. } => *position,
        }
    }
}

/// Category of a parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Lexical error
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// Token that cannot appear here
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// Token text
        token: String,
        /// Token offset
        position: usize,
    },

    /// An operand is missing after an operator, comma or parenthesis
    #[error("Expression expected after position {position}")]
    ExpressionExpectedAfterPosition {
        /// End offset of the token after which the operand is missing
        position: usize,
    },

    /// An operand is missing at a position
    #[error("Expression expected at position {position}")]
    ExpressionExpectedAtPosition {
        /// Offset where the operand is missing
        position: usize,
    },

    /// `(` without matching `)`
    #[error("Missing closing parenthesis for opening parenthesis at position {position}")]
    MissingClosingParenthesis {
        /// Offset of the opening parenthesis
        position: usize,
    },

    /// Method argument not followed by `,` or `)`
    #[error("Comma or closing parenthesis expected after position {position}")]
    CommaOrClosingParenthesisExpected {
        /// End offset of the last argument
        position: usize,
    },

    /// Tokens left after a complete expression
    #[error("Invalid trailing token '{token}' detected at position {position}")]
    TrailingTokenDetected {
        /// First unconsumed token
        token: String,
        /// Its offset
        position: usize,
    },

    /// A name that is not a method is followed by `(`
    #[error("Unknown function '{name}' at position {position}")]
    InvalidMethodCall {
        /// Called name
        name: String,
        /// Offset of the name
        position: usize,
    },

    /// Unknown property of a structural type
    #[error("No property '{property}' exists in type '{type_name}' at position {position}")]
    PropertyNotFoundInType {
        /// Property name
        property: String,
        /// Searched type
        type_name: String,
        /// Offset of the property
        position: usize,
    },

    /// No signature of a binary operator accepts the operand types
    #[error(
        "Operator '{operator}' incompatible with operand types '{left_type}' and '{right_type}' at position {position}"
    )]
    InvalidOperandTypesForBinaryOperator {
        /// Operator literal
        operator: String,
        /// Type of the left operand
        left_type: String,
        /// Type of the right operand
        right_type: String,
        /// Offset of the operator
        position: usize,
    },

    /// No signature of a unary operator accepts the operand type
    #[error(
        "Operator '{operator}' incompatible with operand type '{operand_type}' at position {position}"
    )]
    InvalidOperandTypeForUnaryOperator {
        /// Operator literal
        operator: String,
        /// Type of the operand
        operand_type: String,
        /// Offset of the operator
        position: usize,
    },

    /// Method called with too few or too many arguments
    #[error(
        "Method '{method}' expects {expected} argument(s) but {actual} were given at position {position}"
    )]
    MethodWrongArgumentCount {
        /// Method name
        method: String,
        /// Accepted argument count, e.g. `1..3`
        expected: String,
        /// Given argument count
        actual: usize,
        /// Offset of the method name
        position: usize,
    },

    /// No signature of a method accepts the argument types
    #[error("No applicable method '{method}' found for argument types ({actual}) at position {position}")]
    MethodWrongInputType {
        /// Method name
        method: String,
        /// Actual argument types, comma separated
        actual: String,
        /// Offset of the method name
        position: usize,
    },

    /// A collection-valued property is used as a value
    #[error("Property '{property}' at position {position} has multiplicity 'many' and must be followed by '/'")]
    InvalidMultiplicity {
        /// Property name
        property: String,
        /// Offset of the property
        position: usize,
    },

    /// The left side of `/` is not a property path
    #[error("Left side of '/' at position {position} must be a property")]
    LeftSideNotAProperty {
        /// Offset of the `/` token
        position: usize,
    },

    /// The left side of `/` has a simple type
    #[error(
        "Left side of '/' at position {position} is of simple type '{type_name}', property '{property}' cannot be accessed"
    )]
    LeftSideNotStructuralType {
        /// Type of the left side
        type_name: String,
        /// Property accessed on it
        property: String,
        /// Offset of the `/` token
        position: usize,
    },

    /// The whole expression has the wrong type
    #[error("Type '{expected}' expected but expression has type '{actual}' at position {position}")]
    TypeExpected {
        /// Required type
        expected: String,
        /// Actual type of the expression
        actual: String,
        /// Offset of the expression
        position: usize,
    },

    /// Metadata lookup for a referenced type failed
    #[error("Error accessing metadata of type '{type_name}' at position {position}")]
    EdmAccess {
        /// Referenced type
        type_name: String,
        /// Offset of the referencing token
        position: usize,
    },

    /// Token after an `$orderby` item is not `asc`, `desc` or `,`
    #[error("Invalid sort order '{token}' at position {position}")]
    InvalidSortOrder {
        /// Offending token
        token: String,
        /// Its offset
        position: usize,
    },
}

impl ParseErrorKind {
    /// Offset the error refers to
    pub fn position(&self) -> usize {
        match self {
            ParseErrorKind::Tokenizer(err) => err.position(),
            ParseErrorKind::UnexpectedToken { position, .. }
            | ParseErrorKind::ExpressionExpectedAfterPosition { position }
            | ParseErrorKind::ExpressionExpectedAtPosition { position }
            | ParseErrorKind::MissingClosingParenthesis { position }
            | ParseErrorKind::CommaOrClosingParenthesisExpected { position }
            | ParseErrorKind::TrailingTokenDetected { position, .. }
            | ParseErrorKind::InvalidMethodCall { position, .. }
            | ParseErrorKind::PropertyNotFoundInType { position, .. }
            | ParseErrorKind::InvalidOperandTypesForBinaryOperator { position, .. }
            | ParseErrorKind::InvalidOperandTypeForUnaryOperator { position, .. }
            | ParseErrorKind::MethodWrongArgumentCount { position, .. }
            | ParseErrorKind::MethodWrongInputType { position, .. }
            | ParseErrorKind::InvalidMultiplicity { position, .. }
            | ParseErrorKind::LeftSideNotAProperty { position }
            | ParseErrorKind::LeftSideNotStructuralType { position, .. }
            | ParseErrorKind::TypeExpected { position, .. }
            | ParseErrorKind::EdmAccess { position, .. }
            | ParseErrorKind::InvalidSortOrder { position, .. } => *position,
        }
    }

    /// Text of the offending token, where the error has one
    pub fn offending_text(&self) -> Option<&str> {
        match self {
            ParseErrorKind::Tokenizer(TokenizerError::MalformedLiteral { literal, .. }) => {
                Some(literal)
            }
            ParseErrorKind::UnexpectedToken { token, .. }
            | ParseErrorKind::TrailingTokenDetected { token, .. }
            | ParseErrorKind::InvalidSortOrder { token, .. } => Some(token),
            ParseErrorKind::InvalidMethodCall { name, .. } => Some(name),
            ParseErrorKind::PropertyNotFoundInType { property, .. }
            | ParseErrorKind::InvalidMultiplicity { property, .. } => Some(property),
            ParseErrorKind::InvalidOperandTypesForBinaryOperator { operator, .. }
            | ParseErrorKind::InvalidOperandTypeForUnaryOperator { operator, .. } => {
                Some(operator)
            }
            ParseErrorKind::MethodWrongArgumentCount { method, .. }
            | ParseErrorKind::MethodWrongInputType { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Diagnostic code for this category
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseErrorKind::Tokenizer(TokenizerError::UnknownCharacter { .. }) => {
                DiagnosticCode::UnknownCharacter
            }
            ParseErrorKind::Tokenizer(TokenizerError::UnterminatedStringLiteral { .. }) => {
                DiagnosticCode::UnterminatedString
            }
            ParseErrorKind::Tokenizer(TokenizerError::MalformedLiteral { .. }) => {
                DiagnosticCode::MalformedLiteral
            }
            ParseErrorKind::UnexpectedToken { .. } => DiagnosticCode::UnexpectedToken,
            ParseErrorKind::ExpressionExpectedAfterPosition { .. }
            | ParseErrorKind::ExpressionExpectedAtPosition { .. } => {
                DiagnosticCode::ExpressionExpected
            }
            ParseErrorKind::MissingClosingParenthesis { .. } => {
                DiagnosticCode::MissingClosingParenthesis
            }
            ParseErrorKind::CommaOrClosingParenthesisExpected { .. } => {
                DiagnosticCode::CommaOrClosingParenthesisExpected
            }
            ParseErrorKind::TrailingTokenDetected { .. } => DiagnosticCode::TrailingToken,
            ParseErrorKind::InvalidMethodCall { .. } => DiagnosticCode::UnknownMethod,
            ParseErrorKind::PropertyNotFoundInType { .. } => DiagnosticCode::PropertyNotFound,
            ParseErrorKind::InvalidOperandTypesForBinaryOperator { .. }
            | ParseErrorKind::InvalidOperandTypeForUnaryOperator { .. } => {
                DiagnosticCode::InvalidOperandTypes
            }
            ParseErrorKind::MethodWrongArgumentCount { .. } => DiagnosticCode::InvalidArity,
            ParseErrorKind::MethodWrongInputType { .. } => DiagnosticCode::InvalidArgumentTypes,
            ParseErrorKind::InvalidMultiplicity { .. } => DiagnosticCode::InvalidMultiplicity,
            ParseErrorKind::LeftSideNotAProperty { .. } => DiagnosticCode::LeftSideNotAProperty,
            ParseErrorKind::LeftSideNotStructuralType { .. } => {
                DiagnosticCode::LeftSideNotStructural
            }
            ParseErrorKind::TypeExpected { .. } => DiagnosticCode::TypeExpected,
            ParseErrorKind::EdmAccess { .. } => DiagnosticCode::MetadataAccess,
            ParseErrorKind::InvalidSortOrder { .. } => DiagnosticCode::InvalidSortOrder,
        }
    }
}

/// Parse failure with the expression it occurred in
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} in \"{expression}\"")]
pub struct ParseError {
    /// Failure category and details
    pub kind: ParseErrorKind,
    /// Expression string being parsed
    pub expression: String,
    /// Node whose validation failed, if any
    pub tree: Option<Box<ExpressionNode>>,
}

impl ParseError {
    /// Offset the error refers to
    pub fn position(&self) -> usize {
        self.kind.position()
    }

    /// Convert to a source-located diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let start = self.position().min(self.expression.len());
        let len = self.kind.offending_text().map_or(1, str::len).max(1);
        let end = (start + len).min(self.expression.len()).max(start);

        DiagnosticBuilder::error(self.kind.code())
            .with_message(self.kind.to_string())
            .with_span(start, end)
            .with_source_text(self.expression.clone())
            .build()
    }
}

/// Failure inside the reader, before the expression string is attached
#[derive(Debug)]
pub(crate) struct ReadError {
    pub kind: ParseErrorKind,
    pub tree: Option<Box<ExpressionNode>>,
}

impl ReadError {
    /// Failure of a node that has already been built
    pub fn with_tree(kind: ParseErrorKind, node: ExpressionNode) -> Self {
        Self {
            kind,
            tree: Some(Box::new(node)),
        }
    }

    pub fn into_parse_error(self, expression: &str) -> ParseError {
        ParseError {
            kind: self.kind,
            expression: expression.to_string(),
            tree: self.tree,
        }
    }
}

impl From<ParseErrorKind> for ReadError {
    fn from(kind: ParseErrorKind) -> Self {
        Self { kind, tree: None }
    }
}

impl From<TokenizerError> for ReadError {
    fn from(err: TokenizerError) -> Self {
        ParseErrorKind::from(err).into()
    }
}

pub(crate) type ReadResult<T> = Result<T, ReadError>;
