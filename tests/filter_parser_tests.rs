//! Integration tests for `$filter` parsing against the reference schema

mod common;

use common::{parse_typed, ref_scenario, typed_parser};
use odata_filter::ast::{
    BinaryData, ExpressionKind, ExpressionNode, ExpressionVisitor, FilterExpression, LiteralData,
    MemberData, MethodData, OrderByExpression, OrderExpression, PropertyData, UnaryData,
    walk_expression,
};
use odata_filter::diagnostics::{DiagnosticCode, Severity};
use odata_filter::model::types::type_display;
use odata_filter::model::{EdmSimpleTypeKind, EdmType};
use odata_filter::parser::TokenizerError;
use odata_filter::{FilterParser, ParseErrorKind, ParserConfig, parse_filter};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

/// Renders a tree as an s-expression to make its shape visible
struct TreeShape;

impl ExpressionVisitor for TreeShape {
    type Output = String;

    fn visit_filter_expression(&mut self, _: &FilterExpression, root: Option<String>) -> String {
        root.unwrap_or_default()
    }

    fn visit_order_by_expression(&mut self, _: &OrderByExpression, orders: Vec<String>) -> String {
        orders.join(" ")
    }

    fn visit_order(&mut self, _: &OrderExpression, expression: String) -> String {
        expression
    }

    fn visit_literal(&mut self, literal: &LiteralData) -> String {
        literal.uri_literal.clone()
    }

    fn visit_property(&mut self, property: &PropertyData) -> String {
        property.name.clone()
    }

    fn visit_member(&mut self, _: &MemberData, source: String, path: String) -> String {
        format!("(/ {source} {path})")
    }

    fn visit_unary(&mut self, unary: &UnaryData, operand: String) -> String {
        format!("({} {operand})", unary.op)
    }

    fn visit_binary(&mut self, binary: &BinaryData, left: String, right: String) -> String {
        format!("({} {left} {right})", binary.op)
    }

    fn visit_method(&mut self, method: &MethodData, args: Vec<String>) -> String {
        format!("({} {})", method.method, args.join(" "))
    }
}

fn shape(expression: &str) -> String {
    let filter = parse_filter(expression).unwrap();
    walk_expression(&mut TreeShape, filter.root.as_ref().unwrap())
}

fn lenient() -> FilterParser<'static> {
    FilterParser::new().with_config(ParserConfig::lenient())
}

#[rstest]
#[case("a or c eq d and e eq f", "(or a (and (eq c d) (eq e f)))")]
#[case("a and b or c", "(or (and a b) c)")]
#[case("a add b mul c sub d", "(sub (add a (mul b c)) d)")]
#[case("a sub b sub c", "(sub (sub a b) c)")]
#[case("(a or b) and c", "(and (or a b) c)")]
#[case("not a eq b", "(eq (not a) b)")]
#[case("-a add 1 lt 2", "(lt (add (- a) 1) 2)")]
#[case("a/b/c eq 1", "(eq (/ (/ a b) c) 1)")]
#[case("x eq a/b", "(eq x (/ a b))")]
#[case("startswith(a, 'x') and length(b) gt 2", "(and (startswith a 'x') (gt (length b) 2))")]
fn test_operator_precedence(#[case] expression: &str, #[case] expected: &str) {
    assert_eq!(shape(expression), expected);
}

#[rstest]
#[case("Employee", "Age eq null")]
#[case("Employee", "null eq Age")]
#[case("Employee", "EmployeeName eq 'Walter Winter'")]
#[case("Employee", "Age add 5 gt 30")]
#[case("Employee", "Age gt 30L")]
#[case("Employee", "Grade lt Age")]
#[case("Employee", "Grade add 1 eq 2")]
#[case("Employee", "Rating gt 1.5d")]
#[case("Employee", "Salary ge 1500.50M")]
#[case("Employee", "Location/City/PostalCode eq '69124'")]
#[case("Employee", "ne_Team/Name eq 'Team 1'")]
#[case("Employee", "ne_Team eq null")]
#[case("Employee", "ne_Manager/EmployeeName ne null")]
#[case("Employee", "concat eq 'x'")]
#[case("Employee", "concat('a','b') eq 'ab'")]
#[case("Employee", "concat(EmployeeName, ' ', EmployeeId, '!') eq 'x'")]
#[case("Employee", "substring('abc') eq 'a'")]
#[case("Employee", "substring(EmployeeName, 1, 2) eq 'al'")]
#[case("Employee", "substringof('Wal', EmployeeName) and startswith(EmployeeName, 'W')")]
#[case("Employee", "indexof(EmployeeName, 'W') eq 0")]
#[case("Employee", "length(trim(tolower(EmployeeName))) le 10")]
#[case("Employee", "year(EntryDate) eq 2003")]
#[case("Employee", "month(datetimeoffset'2012-02-29T12:00:00Z') eq 2")]
#[case("Employee", "hour(BirthTime) lt 12")]
#[case("Employee", "round(Salary) gt 1000M")]
#[case("Employee", "floor(Rating) eq 2d")]
#[case("Employee", "not (Age gt 30)")]
#[case("Employee", "-Age lt 0")]
#[case("Employee", "not null")]
#[case("Employee", "-null eq 1")]
#[case("Employee", "- 1 eq -1")]
#[case("Employee", "IsActive")]
#[case("Employee", "not IsActive or Age mod 2 eq 0")]
#[case("Employee", "EntryDate gt datetime'2003-01-01T00:00'")]
#[case("Employee", "BirthTime eq time'PT13H20M'")]
#[case("Employee", "ImageData eq X'0AFF'")]
#[case("Employee", "guid'12345678-aaaa-bbbb-cccc-ddddeeeeffff' ne null")]
#[case("Employee", "Age eq 1 and (EmployeeName eq 'x' or EmployeeId eq 'y')")]
#[case("Team", "nt_Employees/EmployeeName eq 'X'")]
#[case("Team", "isScrumTeam eq true")]
#[case("Manager", "nm_Employees/Location/Country eq 'DE'")]
fn test_typed_filter_is_boolean(#[case] entity_type: &str, #[case] expression: &str) {
    let filter = parse_typed(entity_type, expression).unwrap();
    assert_eq!(filter.edm_type(), Some(&EdmType::BOOLEAN));
    assert_eq!(filter.expression_string, expression);
}

#[rstest]
#[case(
    "Employee",
    "Salary2 eq 1",
    ParseErrorKind::PropertyNotFoundInType {
        property: "Salary2".into(),
        type_name: "RefScenario.Employee".into(),
        position: 0,
    }
)]
#[case(
    "Employee",
    "Location/Street eq 'x'",
    ParseErrorKind::PropertyNotFoundInType {
        property: "Street".into(),
        type_name: "RefScenario.c_Location".into(),
        position: 9,
    }
)]
#[case(
    "Employee",
    "Age/Foo eq 1",
    ParseErrorKind::LeftSideNotStructuralType {
        type_name: "Edm.Int32".into(),
        property: "Foo".into(),
        position: 3,
    }
)]
#[case(
    "Employee",
    "'a'/Name eq 'x'",
    ParseErrorKind::LeftSideNotAProperty { position: 3 }
)]
#[case(
    "Employee",
    "Age add 1",
    ParseErrorKind::TypeExpected {
        expected: "Edm.Boolean".into(),
        actual: "Edm.Int32".into(),
        position: 0,
    }
)]
#[case(
    "Employee",
    "not Age",
    ParseErrorKind::InvalidOperandTypeForUnaryOperator {
        operator: "not".into(),
        operand_type: "Edm.Int32".into(),
        position: 0,
    }
)]
#[case(
    "Employee",
    "EmployeeName add 1 eq 2",
    ParseErrorKind::InvalidOperandTypesForBinaryOperator {
        operator: "add".into(),
        left_type: "Edm.String".into(),
        right_type: "Edm.Int32".into(),
        position: 13,
    }
)]
#[case(
    "Employee",
    "ne_Team eq 1",
    ParseErrorKind::InvalidOperandTypesForBinaryOperator {
        operator: "eq".into(),
        left_type: "RefScenario.Team".into(),
        right_type: "Edm.Int32".into(),
        position: 8,
    }
)]
#[case(
    "Employee",
    "concat('a') eq 'a'",
    ParseErrorKind::MethodWrongArgumentCount {
        method: "concat".into(),
        expected: "2..*".into(),
        actual: 1,
        position: 0,
    }
)]
#[case(
    "Employee",
    "length(Age) eq 1",
    ParseErrorKind::MethodWrongInputType {
        method: "length".into(),
        actual: "Edm.Int32".into(),
        position: 0,
    }
)]
#[case(
    "Team",
    "nt_Employees eq null",
    ParseErrorKind::InvalidMultiplicity {
        property: "nt_Employees".into(),
        position: 0,
    }
)]
fn test_typed_filter_errors(
    #[case] entity_type: &str,
    #[case] expression: &str,
    #[case] expected: ParseErrorKind,
) {
    let err = parse_typed(entity_type, expression).unwrap_err();
    assert_eq!(err.kind, expected);
    assert_eq!(err.expression, expression);
}

#[rstest]
#[case(
    "city eq 'X' extra",
    ParseErrorKind::TrailingTokenDetected { token: "extra".into(), position: 12 }
)]
#[case(
    "'abc' add 1",
    ParseErrorKind::InvalidOperandTypesForBinaryOperator {
        operator: "add".into(),
        left_type: "Edm.String".into(),
        right_type: "Edm.Int32".into(),
        position: 6,
    }
)]
#[case(
    "foo(1) eq 2",
    ParseErrorKind::InvalidMethodCall { name: "foo".into(), position: 0 }
)]
#[case("(a eq 1", ParseErrorKind::MissingClosingParenthesis { position: 0 })]
#[case(
    "concat('a' 'b')",
    ParseErrorKind::CommaOrClosingParenthesisExpected { position: 10 }
)]
#[case("concat(,'a')", ParseErrorKind::ExpressionExpectedAtPosition { position: 7 })]
#[case("concat('a',", ParseErrorKind::MissingClosingParenthesis { position: 6 })]
#[case("concat('a'", ParseErrorKind::MissingClosingParenthesis { position: 6 })]
#[case("concat('a','b'", ParseErrorKind::MissingClosingParenthesis { position: 6 })]
#[case("concat(", ParseErrorKind::MissingClosingParenthesis { position: 6 })]
#[case("a eq length( 'x'", ParseErrorKind::MissingClosingParenthesis { position: 11 })]
#[case("concat('a',)", ParseErrorKind::ExpressionExpectedAfterPosition { position: 11 })]
#[case("a eq", ParseErrorKind::ExpressionExpectedAfterPosition { position: 4 })]
#[case("a eq 1 and", ParseErrorKind::ExpressionExpectedAfterPosition { position: 10 })]
#[case("not", ParseErrorKind::ExpressionExpectedAfterPosition { position: 3 })]
#[case("a eq ()", ParseErrorKind::ExpressionExpectedAfterPosition { position: 6 })]
#[case(
    "a eq /b",
    ParseErrorKind::UnexpectedToken { token: "/".into(), position: 5 }
)]
#[case(
    ") eq 1",
    ParseErrorKind::UnexpectedToken { token: ")".into(), position: 0 }
)]
#[case(
    "a eq 'abc",
    ParseErrorKind::Tokenizer(TokenizerError::UnterminatedStringLiteral { position: 5 })
)]
#[case(
    "a eq 1 # 2",
    ParseErrorKind::Tokenizer(TokenizerError::UnknownCharacter { character: '#', position: 7 })
)]
fn test_untyped_filter_errors(#[case] expression: &str, #[case] expected: ParseErrorKind) {
    let err = parse_filter(expression).unwrap_err();
    assert_eq!(err.kind, expected);
}

#[test]
fn test_empty_input_has_no_tree() {
    for input in ["", " \t "] {
        let filter = parse_filter(input).unwrap();
        assert!(filter.root.is_none());
        assert!(filter.edm_type().is_none());

        assert!(parse_typed("Employee", input).unwrap().is_empty());
    }
}

#[test]
fn test_untyped_mode_leaves_properties_unresolved() {
    let filter = parse_filter("Salary2 eq 1 or ne_Team/Whatever lt 2").unwrap();
    assert_eq!(filter.edm_type(), None);

    let filter = parse_filter("1 eq 2").unwrap();
    assert_eq!(filter.edm_type(), Some(&EdmType::BOOLEAN));
}

#[test]
fn test_method_name_disambiguation() {
    let property = parse_typed("Employee", "concat eq 'x'").unwrap();
    let method = parse_typed("Employee", "concat('a','b') eq 'ab'").unwrap();

    let left_kind = |filter: &FilterExpression| match filter.root.as_ref() {
        Some(ExpressionNode::Binary(binary)) => binary.left.kind(),
        other => panic!("expected binary root, got {other:?}"),
    };
    assert_eq!(left_kind(&property), ExpressionKind::Property);
    assert_eq!(left_kind(&method), ExpressionKind::Method);
}

#[test]
fn test_resolved_property_is_attached() {
    let filter = parse_typed("Employee", "Location/City/PostalCode eq '69124'").unwrap();
    let Some(ExpressionNode::Binary(binary)) = filter.root else {
        panic!("expected binary root");
    };
    let ExpressionNode::Member(member) = &binary.left else {
        panic!("expected member access");
    };
    let ExpressionNode::Property(postal_code) = &member.path else {
        panic!("expected property path");
    };

    let property = postal_code.property.as_ref().unwrap();
    assert_eq!(property.name, "PostalCode");
    assert_eq!(member.edm_type, Some(EdmType::Simple(EdmSimpleTypeKind::String)));
    assert_eq!(member.position, 13);
}

#[test]
fn test_type_promotion_can_be_disabled() {
    let schema = ref_scenario();
    let strict = typed_parser(&schema, "Employee").with_config(ParserConfig::strict());

    let err = strict.parse_filter("Age gt 30L").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::InvalidOperandTypesForBinaryOperator {
            operator: "gt".into(),
            left_type: "Edm.Int32".into(),
            right_type: "Edm.Int64".into(),
            position: 4,
        }
    );
    assert!(strict.parse_filter("Age gt 30").is_ok());
}

#[test]
fn test_failed_node_is_attached_to_error() {
    let err = parse_typed("Employee", "Age eq 1 and EmployeeName add 1 eq 2").unwrap_err();
    let tree = err.tree.expect("validation error carries the failed node");
    assert_eq!(tree.to_uri(), "EmployeeName add 1");
}

#[rstest]
#[case("'it''s'")]
#[case("12L")]
#[case("1.5M")]
#[case("2.0d")]
#[case("1e10")]
#[case("-42")]
#[case("true")]
#[case("null")]
#[case("datetime'2003-01-01T00:00'")]
#[case("datetimeoffset'2012-02-29T12:00:00+01:00'")]
#[case("time'PT5S'")]
#[case("X'0AFF'")]
#[case("binary'0aff'")]
#[case("guid'12345678-aaaa-bbbb-cccc-ddddeeeeffff'")]
#[case("EmployeeName")]
fn test_literal_and_property_round_trip(#[case] text: &str) {
    let filter = lenient().parse_filter(text).unwrap();
    let root = filter.root.unwrap();
    assert_eq!(root.uri_literal(), text);
    assert_eq!(root.to_uri(), text);
}

#[rstest]
#[case(
    "startswith(EmployeeName, 'W') and (Age add 1) mul 2 gt 10",
    "startswith(EmployeeName,'W') and (Age add 1) mul 2 gt 10"
)]
#[case("(a or b) and c", "(a or b) and c")]
#[case("a or (b and c)", "a or b and c")]
#[case("a sub (b sub c) eq 0", "a sub (b sub c) eq 0")]
#[case("not (a/b)", "not (a/b)")]
#[case("-(a add 1) lt 0", "-(a add 1) lt 0")]
#[case("- 1 eq a", "- 1 eq a")]
#[case("-(2L) eq a", "- 2L eq a")]
fn test_rendering_normalizes_parentheses(#[case] expression: &str, #[case] expected: &str) {
    let filter = lenient().parse_filter(expression).unwrap();
    assert_eq!(filter.root.unwrap().to_uri(), expected);
}

#[rstest]
#[case("- 1")]
#[case("-(1.5d)")]
#[case("-a")]
fn test_rendered_negation_keeps_tree_shape(#[case] expression: &str) {
    let parsed = lenient().parse_filter(expression).unwrap().root.unwrap();
    let reparsed = lenient().parse_filter(&parsed.to_uri()).unwrap().root.unwrap();
    assert_eq!(parsed.kind(), ExpressionKind::Unary);
    assert_eq!(reparsed.kind(), ExpressionKind::Unary);
    assert_eq!(reparsed.to_uri(), parsed.to_uri());
}

#[test]
fn test_concurrent_parses_share_schema() {
    let schema = Arc::new(ref_scenario());

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let parser = typed_parser(&schema, "Employee");
                let expression = format!("Age add {index} gt 30 and startswith(EmployeeName, 'W')");
                let filter = parser.parse_filter(&expression).unwrap();
                let missing = parser.parse_filter("Salary2 eq 1").unwrap_err();
                (type_display(filter.edm_type()), missing.position())
            })
        })
        .collect();

    for handle in handles {
        let (edm_type, error_position) = handle.join().unwrap();
        assert_eq!(edm_type, "Edm.Boolean");
        assert_eq!(error_position, 0);
    }
}

#[test]
fn test_error_converts_to_diagnostic() {
    let err = parse_filter("city eq 'X' extra").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid trailing token 'extra' detected at position 12 in \"city eq 'X' extra\""
    );

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.code, DiagnosticCode::TrailingToken);
    assert_eq!((diagnostic.span.start, diagnostic.span.end), (12, 17));
    assert_eq!(diagnostic.source_text.as_deref(), Some("city eq 'X' extra"));
}
