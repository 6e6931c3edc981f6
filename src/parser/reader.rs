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

//! Recursive descent reader shared by the `$filter` and `$orderby` parsers
//!
//! Elements (literals, properties, method calls, parenthesized expressions
//! and unary operations) are read by [`ExpressionReader::read_element`];
//! binary operators are combined by priority in
//! [`ExpressionReader::read_elements`]. Each node is validated as soon as it
//! is built.

use super::error::{ParseErrorKind, ReadError, ReadResult};
use super::tokenizer::{Token, TokenKind, TokenList};
use crate::analyzer::{MemberSource, ResourceContext, TypeValidator, resolve_property};
use crate::ast::{BinaryOperator, ExpressionNode, MethodArgs, PropertyData};
use crate::config::ParserConfig;
use crate::model::EdmType;
use crate::registry::{InfoBinaryOperator, InfoMethod, InfoUnaryOperator, registry};
use smallvec::SmallVec;

/// A binary operator token together with its descriptor
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActualBinaryOperator {
    pub info: &'static InfoBinaryOperator,
    pub position: usize,
    pub end: usize,
}

pub(crate) struct ExpressionReader<'input, 'm> {
    tokens: TokenList<'input>,
    context: Option<ResourceContext<'m>>,
    validator: TypeValidator,
}

impl<'input, 'm> ExpressionReader<'input, 'm> {
    pub fn new(
        tokens: TokenList<'input>,
        context: Option<ResourceContext<'m>>,
        config: &ParserConfig,
    ) -> Self {
        let validator = TypeValidator::new(context.is_some(), config.type_promotion);
        Self {
            tokens,
            context,
            validator,
        }
    }

    pub fn tokens(&self) -> &TokenList<'input> {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut TokenList<'input> {
        &mut self.tokens
    }

    /// End offset of the last consumed token, or `fallback`
    fn prev_end(&self, fallback: usize) -> usize {
        self.tokens.look_prev().map_or(fallback, Token::end)
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.tokens.look().is_some_and(|token| token.kind == kind)
    }

    /// Look at the next token as a binary operator without consuming it
    pub fn read_binary_operator(&self) -> Option<ActualBinaryOperator> {
        let token = self.tokens.look()?;
        let info = match token.kind {
            TokenKind::Symbol if token.uri_literal == "/" => registry().lookup_binary("/"),
            TokenKind::Literal => registry().lookup_binary(token.uri_literal),
            _ => None,
        }?;
        Some(ActualBinaryOperator {
            info,
            position: token.position,
            end: token.end(),
        })
    }

    fn lookup_unary(token: &Token<'_>) -> Option<&'static InfoUnaryOperator> {
        match token.kind {
            TokenKind::Literal | TokenKind::Symbol => registry().lookup_unary(token.uri_literal),
            _ => None,
        }
    }

    /// Read one element; `None` when the next token ends an expression
    ///
    /// `left` and `left_operator` describe the operation this element is the
    /// right operand of; a property following `/` is resolved in the type of
    /// `left`.
    pub fn read_element(
        &mut self,
        left: Option<&ExpressionNode>,
        left_operator: Option<&ActualBinaryOperator>,
    ) -> ReadResult<Option<ExpressionNode>> {
        let Some(token) = self.tokens.look().cloned() else {
            return Ok(None);
        };

        match token.kind {
            TokenKind::OpenParen => return self.read_parenthesis(&token).map(Some),
            TokenKind::CloseParen | TokenKind::Comma => return Ok(None),
            _ => {}
        }

        if let Some(info) = Self::lookup_unary(&token) {
            return self.read_unary_operator(&token, info).map(Some);
        }

        self.tokens.next();
        let next_is_open_paren = self.next_is(TokenKind::OpenParen);

        match token.kind {
            TokenKind::Literal => {
                if let Some(info) = registry().lookup_method(token.uri_literal, next_is_open_paren) {
                    return self.read_method(&token, info).map(Some);
                }
                if next_is_open_paren {
                    return Err(ParseErrorKind::InvalidMethodCall {
                        name: token.uri_literal.to_string(),
                        position: token.position,
                    }
                    .into());
                }
                self.read_property(&token, left, left_operator).map(Some)
            }
            TokenKind::SimpleType => match token.value {
                Some(value) => Ok(Some(ExpressionNode::literal(
                    token.uri_literal,
                    value,
                    token.position,
                ))),
                None => Err(ParseErrorKind::UnexpectedToken {
                    token: token.uri_literal.to_string(),
                    position: token.position,
                }
                .into()),
            },
            _ => Err(ParseErrorKind::UnexpectedToken {
                token: token.uri_literal.to_string(),
                position: token.position,
            }
            .into()),
        }
    }

    /// Absorb binary operators of at least `min_priority` into `left`
    pub fn read_elements(
        &mut self,
        left: ExpressionNode,
        min_priority: u8,
    ) -> ReadResult<ExpressionNode> {
        let mut left = left;
        let mut operator = self.read_binary_operator();

        while let Some(op) = operator.filter(|op| op.info.priority >= min_priority) {
            self.tokens.next();

            let mut right = self
                .read_element(Some(&left), Some(&op))?
                .ok_or(ParseErrorKind::ExpressionExpectedAfterPosition { position: op.end })?;

            // `a or c eq d and e eq f` must give `a or ((c eq d) and (e eq f))`,
            // so every following operator that binds tighter is absorbed here
            let mut next = self.read_binary_operator();
            while let Some(next_op) = next.filter(|n| n.info.priority > op.info.priority) {
                right = self.read_elements(right, next_op.info.priority)?;
                next = self.read_binary_operator();
            }

            left = self.combine(&op, left, right)?;
            operator = self.read_binary_operator();
        }

        Ok(left)
    }

    fn combine(
        &self,
        op: &ActualBinaryOperator,
        left: ExpressionNode,
        right: ExpressionNode,
    ) -> ReadResult<ExpressionNode> {
        let info = op.info;
        let is_member = info.operator == BinaryOperator::PropertyAccess;

        if is_member && !matches!(right, ExpressionNode::Property(_)) {
            return Err(ParseErrorKind::UnexpectedToken {
                token: right.uri_literal().to_string(),
                position: right.position(),
            }
            .into());
        }

        let result =
            self.validator
                .validate_binary(info, left.edm_type(), right.edm_type(), op.position);
        let mut node = if is_member {
            ExpressionNode::member(left, right, op.position)
        } else {
            ExpressionNode::binary(info.operator, left, right, op.position)
        };

        match result {
            Ok(edm_type) => {
                node.set_edm_type(edm_type);
                log::trace!(
                    "combined '{}' at {} -> {}",
                    info.syntax,
                    op.position,
                    crate::model::types::type_display(node.edm_type())
                );
                Ok(node)
            }
            Err(kind) => Err(ReadError::with_tree(kind, node)),
        }
    }

    fn read_parenthesis(&mut self, open: &Token<'input>) -> ReadResult<ExpressionNode> {
        self.tokens.next();

        let Some(first) = self.read_element(None, None)? else {
            if self.tokens.has_tokens() {
                return Err(ParseErrorKind::ExpressionExpectedAfterPosition {
                    position: open.end(),
                }
                .into());
            }
            return Err(ParseErrorKind::MissingClosingParenthesis {
                position: open.position,
            }
            .into());
        };
        let node = self.read_elements(first, 0)?;

        if self.next_is(TokenKind::CloseParen) {
            self.tokens.next();
            Ok(node)
        } else {
            Err(ParseErrorKind::MissingClosingParenthesis {
                position: open.position,
            }
            .into())
        }
    }

    fn read_unary_operator(
        &mut self,
        token: &Token<'input>,
        info: &'static InfoUnaryOperator,
    ) -> ReadResult<ExpressionNode> {
        self.tokens.next();

        let operand = self
            .read_element(None, None)?
            .ok_or(ParseErrorKind::ExpressionExpectedAfterPosition {
                position: token.end(),
            })?;

        let result = self
            .validator
            .validate_unary(info, operand.edm_type(), token.position);
        let mut node = ExpressionNode::unary(info.operator, operand, token.position);

        match result {
            Ok(edm_type) => {
                node.set_edm_type(edm_type);
                Ok(node)
            }
            Err(kind) => Err(ReadError::with_tree(kind, node)),
        }
    }

    fn read_method(
        &mut self,
        token: &Token<'input>,
        info: &'static InfoMethod,
    ) -> ReadResult<ExpressionNode> {
        let args = self.read_parameters(token)?;

        let result = {
            let types: SmallVec<[Option<&EdmType>; 4]> =
                args.iter().map(ExpressionNode::edm_type).collect();
            self.validator.validate_method(info, &types, token.position)
        };
        let mut node = ExpressionNode::method(info.method, args, token.position);

        match result {
            Ok(edm_type) => {
                node.set_edm_type(edm_type);
                Ok(node)
            }
            Err(kind) => Err(ReadError::with_tree(kind, node)),
        }
    }

    /// Read `( [expr {, expr}] )` after a method name
    fn read_parameters(&mut self, method: &Token<'input>) -> ReadResult<MethodArgs> {
        let (open_position, open_end) = match self.tokens.next() {
            Some(open) => (open.position, open.end()),
            None => (method.end(), method.end()),
        };

        let mut args = MethodArgs::new();
        let mut expect_another = false;
        let mut read_comma = true;

        loop {
            let Some(token) = self.tokens.look() else {
                return Err(ParseErrorKind::MissingClosingParenthesis {
                    position: open_position,
                }
                .into());
            };
            if token.kind == TokenKind::CloseParen {
                break;
            }
            if !read_comma {
                return Err(ParseErrorKind::CommaOrClosingParenthesisExpected {
                    position: self.prev_end(open_end),
                }
                .into());
            }

            let expression = match self.read_element(None, None)? {
                Some(first) => Some(self.read_elements(first, 0)?),
                None => None,
            };
            let has_expression = expression.is_some();
            match expression {
                Some(expression) => args.push(expression),
                None if expect_another => {
                    return Err(ParseErrorKind::ExpressionExpectedAfterPosition {
                        position: self.prev_end(open_end),
                    }
                    .into());
                }
                None => {}
            }

            match self.tokens.look() {
                Some(comma) if comma.kind == TokenKind::Comma => {
                    if !has_expression {
                        return Err(ParseErrorKind::ExpressionExpectedAtPosition {
                            position: comma.position,
                        }
                        .into());
                    }
                    self.tokens.next();
                    expect_another = true;
                    read_comma = true;
                }
                _ => {
                    expect_another = false;
                    read_comma = false;
                }
            }
        }

        if expect_another {
            return Err(ParseErrorKind::ExpressionExpectedAfterPosition {
                position: self.prev_end(open_end),
            }
            .into());
        }

        self.tokens.next();
        Ok(args)
    }

    fn read_property(
        &mut self,
        token: &Token<'input>,
        left: Option<&ExpressionNode>,
        left_operator: Option<&ActualBinaryOperator>,
    ) -> ReadResult<ExpressionNode> {
        let Some(context) = self.context else {
            return Ok(ExpressionNode::property(token.uri_literal, token.position));
        };

        let member = match (left, left_operator) {
            (Some(node), Some(op)) if op.info.operator == BinaryOperator::PropertyAccess => {
                Some(MemberSource {
                    node,
                    position: op.position,
                })
            }
            _ => None,
        };
        let followed_by_member = self
            .tokens
            .look()
            .is_some_and(|next| next.is(TokenKind::Symbol, "/"));

        let property = resolve_property(
            &context,
            token.uri_literal,
            token.position,
            member,
            followed_by_member,
        )?;

        Ok(ExpressionNode::Property(PropertyData {
            name: token.uri_literal.to_string(),
            edm_type: Some(property.edm_type.clone()),
            property: Some(property),
            position: token.position,
        }))
    }
}
