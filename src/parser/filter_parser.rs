//! `$filter` parser entry points

use super::error::{ParseErrorKind, ParseResult, ReadError, ReadResult};
use super::reader::ExpressionReader;
use super::tokenizer::{TokenList, tokenize};
use crate::analyzer::ResourceContext;
use crate::ast::{ExpressionNode, FilterExpression};
use crate::config::ParserConfig;
use crate::model::EdmType;

/// Parser for `$filter` and `$orderby` expressions
///
/// Without a resource context the parser runs untyped: property names are
/// accepted as-is and only fully typed operations are checked.
///
/// # Examples
///
/// ```
/// use odata_filter::parser::FilterParser;
///
/// let filter = FilterParser::new().parse_filter("a eq 1 or b lt 2").unwrap();
/// assert_eq!(filter.root.unwrap().to_uri(), "a eq 1 or b lt 2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterParser<'m> {
    pub(super) context: Option<ResourceContext<'m>>,
    pub(super) config: ParserConfig,
}

impl<'m> FilterParser<'m> {
    /// Untyped parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser resolving properties against `context`
    pub fn with_resource(context: ResourceContext<'m>) -> Self {
        Self {
            context: Some(context),
            config: ParserConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Check whether properties are resolved against metadata
    pub fn is_typed(&self) -> bool {
        self.context.is_some()
    }

    /// Parse a `$filter` expression string
    pub fn parse_filter(&self, expression: &str) -> ParseResult<FilterExpression> {
        log::debug!("parsing $filter '{expression}'");
        let tokens = tokenize(expression)
            .map_err(|err| ReadError::from(err).into_parse_error(expression))?;
        self.parse_tokens(tokens, expression)
    }

    /// Parse an already tokenized `$filter` expression
    ///
    /// `expression` is the source string the tokens were read from; it is
    /// kept in the result and in errors.
    pub fn parse_tokens(
        &self,
        tokens: TokenList<'_>,
        expression: &str,
    ) -> ParseResult<FilterExpression> {
        if tokens.is_empty() {
            return Ok(FilterExpression {
                expression_string: expression.to_string(),
                root: None,
            });
        }

        let mut reader = ExpressionReader::new(tokens, self.context, &self.config);
        let root = read_filter(&mut reader, self.config.require_boolean).map_err(|err| {
            log::debug!("$filter '{expression}' rejected: {}", err.kind);
            err.into_parse_error(expression)
        })?;

        Ok(FilterExpression {
            expression_string: expression.to_string(),
            root: Some(root),
        })
    }
}

fn read_filter(reader: &mut ExpressionReader<'_, '_>, require_boolean: bool) -> ReadResult<ExpressionNode> {
    let Some(first) = reader.read_element(None, None)? else {
        return Err(unexpected_token(reader));
    };
    let root = reader.read_elements(first, 0)?;

    if let Some(token) = reader.tokens().look() {
        return Err(ParseErrorKind::TrailingTokenDetected {
            token: token.uri_literal.to_string(),
            position: token.position,
        }
        .into());
    }

    if require_boolean {
        if let Some(edm_type) = root.edm_type() {
            if *edm_type != EdmType::BOOLEAN {
                return Err(ReadError::with_tree(
                    ParseErrorKind::TypeExpected {
                        expected: EdmType::BOOLEAN.to_string(),
                        actual: edm_type.to_string(),
                        position: 0,
                    },
                    root,
                ));
            }
        }
    }

    Ok(root)
}

pub(super) fn unexpected_token(reader: &ExpressionReader<'_, '_>) -> ReadError {
    match reader.tokens().look() {
        Some(token) => ParseErrorKind::UnexpectedToken {
            token: token.uri_literal.to_string(),
            position: token.position,
        }
        .into(),
        None => ParseErrorKind::ExpressionExpectedAtPosition { position: 0 }.into(),
    }
}

/// Parse a `$filter` expression without metadata
pub fn parse_filter(expression: &str) -> ParseResult<FilterExpression> {
    FilterParser::new().parse_filter(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, ExpressionKind};
    use crate::model::{EdmSimpleTypeKind, Schema};

    fn schema() -> Schema {
        let mut schema = Schema::new("RefScenario");
        schema
            .add_entity_type("Employee")
            .simple("EmployeeName", EdmSimpleTypeKind::String)
            .simple("Age", EdmSimpleTypeKind::Int32);
        schema
    }

    #[test]
    fn test_empty_expression() {
        for input in ["", "   "] {
            let filter = parse_filter(input).unwrap();
            assert!(filter.is_empty());
            assert_eq!(filter.expression_string, input);
        }
    }

    #[test]
    fn test_priority_of_logical_operators() {
        let filter = parse_filter("a or c eq d and e eq f").unwrap();
        let root = filter.root.unwrap();
        match &root {
            ExpressionNode::Binary(binary) => {
                assert_eq!(binary.op, BinaryOperator::Or);
                assert_eq!(binary.right.kind(), ExpressionKind::Binary);
            }
            other => panic!("expected binary root, got {other:?}"),
        }
        assert_eq!(root.to_uri(), "a or c eq d and e eq f");
    }

    #[test]
    fn test_trailing_token() {
        let err = parse_filter("a eq 1 b").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::TrailingTokenDetected {
                token: "b".to_string(),
                position: 7,
            }
        );
    }

    #[test]
    fn test_leading_close_paren_is_unexpected() {
        let err = parse_filter(") eq 1").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { position: 0, .. }));
    }

    #[test]
    fn test_typed_filter_must_be_boolean() {
        let schema = schema();
        let context = ResourceContext::new(&schema, schema.entity_type("Employee").unwrap());
        let parser = FilterParser::with_resource(context);

        let err = parser.parse_filter("Age add 1").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::TypeExpected {
                expected: "Edm.Boolean".to_string(),
                actual: "Edm.Int32".to_string(),
                position: 0,
            }
        );
        assert!(err.tree.is_some());

        let relaxed = parser.clone().with_config(ParserConfig {
            require_boolean: false,
            ..ParserConfig::default()
        });
        let filter = relaxed.parse_filter("Age add 1").unwrap();
        assert_eq!(filter.edm_type(), Some(&EdmType::Simple(EdmSimpleTypeKind::Int32)));
    }

    #[test]
    fn test_parse_tokens_keeps_expression_string() {
        let input = "EmployeeName eq 'Walter Winter'";
        let tokens = tokenize(input).unwrap();
        let filter = FilterParser::new().parse_tokens(tokens, input).unwrap();
        assert_eq!(filter.expression_string, input);
    }
}
