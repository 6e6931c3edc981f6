//! `$orderby` parsing

use super::error::{ParseErrorKind, ParseResult, ReadError, ReadResult};
use super::filter_parser::{FilterParser, unexpected_token};
use super::reader::ExpressionReader;
use super::tokenizer::{TokenKind, tokenize};
use crate::ast::{OrderByExpression, OrderExpression, SortOrder};

impl FilterParser<'_> {
    /// Parse an `$orderby` expression string
    ///
    /// Items are separated by commas; each may be followed by `asc` or
    /// `desc`. The item expressions may have any type.
    pub fn parse_order_by(&self, expression: &str) -> ParseResult<OrderByExpression> {
        log::debug!("parsing $orderby '{expression}'");
        let tokens = tokenize(expression)
            .map_err(|err| ReadError::from(err).into_parse_error(expression))?;

        let orders = if tokens.is_empty() {
            Vec::new()
        } else {
            let mut reader = ExpressionReader::new(tokens, self.context, &self.config);
            read_orders(&mut reader).map_err(|err| err.into_parse_error(expression))?
        };

        Ok(OrderByExpression {
            expression_string: expression.to_string(),
            orders,
        })
    }
}

fn read_orders(reader: &mut ExpressionReader<'_, '_>) -> ReadResult<Vec<OrderExpression>> {
    let mut orders = Vec::new();

    loop {
        let Some(first) = reader.read_element(None, None)? else {
            return Err(match reader.tokens().look() {
                Some(token) if token.kind == TokenKind::Comma => {
                    ParseErrorKind::ExpressionExpectedAtPosition {
                        position: token.position,
                    }
                    .into()
                }
                _ => unexpected_token(reader),
            });
        };
        let expression = reader.read_elements(first, 0)?;

        let sort_order = match reader.tokens().look() {
            Some(token) if token.kind == TokenKind::Literal => {
                match SortOrder::from_uri_literal(token.uri_literal) {
                    Some(order) => {
                        reader.tokens_mut().next();
                        order
                    }
                    None => return Err(invalid_sort_order(token.uri_literal, token.position)),
                }
            }
            _ => SortOrder::Asc,
        };
        orders.push(OrderExpression {
            expression,
            sort_order,
        });

        let Some(token) = reader.tokens().look() else {
            break;
        };
        if token.kind != TokenKind::Comma {
            return Err(invalid_sort_order(token.uri_literal, token.position));
        }
        let comma_end = token.end();
        reader.tokens_mut().next();

        if !reader.tokens().has_tokens() {
            return Err(ParseErrorKind::ExpressionExpectedAfterPosition {
                position: comma_end,
            }
            .into());
        }
    }

    Ok(orders)
}

fn invalid_sort_order(token: &str, position: usize) -> ReadError {
    ParseErrorKind::InvalidSortOrder {
        token: token.to_string(),
        position,
    }
    .into()
}

/// Parse an `$orderby` expression without metadata
pub fn parse_order_by(expression: &str) -> ParseResult<OrderByExpression> {
    FilterParser::new().parse_order_by(expression)
}
