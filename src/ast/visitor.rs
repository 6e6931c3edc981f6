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

//! Visitor pattern for expression tree traversal
//!
//! [`ExpressionVisitor`] is a fold: children are visited first and their
//! results are handed to the parent's `visit_*` method. A visitor that can
//! fail uses a `Result` as its output.

use super::expression::{
    BinaryData, ExpressionNode, FilterExpression, LiteralData, MemberData, MethodData,
    OrderByExpression, OrderExpression, PropertyData, UnaryData,
};
use super::operator::{BinaryOperator, UnaryOperator};

/// Fold-style visitor over expression trees
pub trait ExpressionVisitor {
    /// Result of visiting a node
    type Output;

    /// Visit the root of a `$filter` expression
    fn visit_filter_expression(
        &mut self,
        filter: &FilterExpression,
        root: Option<Self::Output>,
    ) -> Self::Output;

    /// Visit the root of an `$orderby` expression
    fn visit_order_by_expression(
        &mut self,
        order_by: &OrderByExpression,
        orders: Vec<Self::Output>,
    ) -> Self::Output;

    /// Visit one `$orderby` item
    fn visit_order(&mut self, order: &OrderExpression, expression: Self::Output) -> Self::Output;

    /// Visit a literal
    fn visit_literal(&mut self, literal: &LiteralData) -> Self::Output;

    /// Visit a property
    fn visit_property(&mut self, property: &PropertyData) -> Self::Output;

    /// Visit a member access
    fn visit_member(
        &mut self,
        member: &MemberData,
        source: Self::Output,
        path: Self::Output,
    ) -> Self::Output;

    /// Visit a unary operation
    fn visit_unary(&mut self, unary: &UnaryData, operand: Self::Output) -> Self::Output;

    /// Visit a binary operation
    fn visit_binary(
        &mut self,
        binary: &BinaryData,
        left: Self::Output,
        right: Self::Output,
    ) -> Self::Output;

    /// Visit a method call
    fn visit_method(&mut self, method: &MethodData, args: Vec<Self::Output>) -> Self::Output;
}

/// Fold an expression subtree
pub fn walk_expression<V: ExpressionVisitor>(visitor: &mut V, expr: &ExpressionNode) -> V::Output {
    match expr {
        ExpressionNode::Literal(data) => visitor.visit_literal(data),
        ExpressionNode::Property(data) => visitor.visit_property(data),
        ExpressionNode::Member(data) => {
            let source = walk_expression(visitor, &data.source);
            let path = walk_expression(visitor, &data.path);
            visitor.visit_member(data, source, path)
        }
        ExpressionNode::Unary(data) => {
            let operand = walk_expression(visitor, &data.operand);
            visitor.visit_unary(data, operand)
        }
        ExpressionNode::Binary(data) => {
            let left = walk_expression(visitor, &data.left);
            let right = walk_expression(visitor, &data.right);
            visitor.visit_binary(data, left, right)
        }
        ExpressionNode::Method(data) => {
            let args = data
                .args
                .iter()
                .map(|arg| walk_expression(visitor, arg))
                .collect();
            visitor.visit_method(data, args)
        }
    }
}

/// Fold a `$filter` expression
pub fn walk_filter<V: ExpressionVisitor>(visitor: &mut V, filter: &FilterExpression) -> V::Output {
    let root = filter
        .root
        .as_ref()
        .map(|root| walk_expression(visitor, root));
    visitor.visit_filter_expression(filter, root)
}

/// Fold an `$orderby` expression
pub fn walk_order_by<V: ExpressionVisitor>(
    visitor: &mut V,
    order_by: &OrderByExpression,
) -> V::Output {
    let orders = order_by
        .orders
        .iter()
        .map(|order| {
            let expression = walk_expression(visitor, &order.expression);
            visitor.visit_order(order, expression)
        })
        .collect();
    visitor.visit_order_by_expression(order_by, orders)
}

const ATOM_PRIORITY: u8 = u8::MAX;
const UNARY_PRIORITY: u8 = 110;

fn binding_priority(node: &ExpressionNode) -> u8 {
    match node {
        ExpressionNode::Binary(data) => data.op.priority(),
        ExpressionNode::Member(_) => BinaryOperator::PropertyAccess.priority(),
        ExpressionNode::Unary(_) => UNARY_PRIORITY,
        _ => ATOM_PRIORITY,
    }
}

fn parenthesize(rendered: String) -> String {
    format!("({rendered})")
}

/// Renders expression trees back to URI syntax
///
/// Parentheses are only emitted where the tree shape differs from what the
/// parser would build from the unparenthesized text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriRenderer;

impl ExpressionVisitor for UriRenderer {
    type Output = String;

    fn visit_filter_expression(&mut self, _filter: &FilterExpression, root: Option<String>) -> String {
        root.unwrap_or_default()
    }

    fn visit_order_by_expression(
        &mut self,
        _order_by: &OrderByExpression,
        orders: Vec<String>,
    ) -> String {
        orders.join(",")
    }

    fn visit_order(&mut self, order: &OrderExpression, expression: String) -> String {
        format!("{expression} {}", order.sort_order)
    }

    fn visit_literal(&mut self, literal: &LiteralData) -> String {
        literal.uri_literal.clone()
    }

    fn visit_property(&mut self, property: &PropertyData) -> String {
        property.name.clone()
    }

    fn visit_member(&mut self, member: &MemberData, source: String, path: String) -> String {
        let source = if binding_priority(&member.source) < BinaryOperator::PropertyAccess.priority() {
            parenthesize(source)
        } else {
            source
        };
        format!("{source}/{path}")
    }

    fn visit_unary(&mut self, unary: &UnaryData, operand: String) -> String {
        let operand = match unary.operand {
            ExpressionNode::Binary(_) | ExpressionNode::Member(_) => parenthesize(operand),
            _ => operand,
        };
        match unary.op {
            UnaryOperator::Not => format!("not {operand}"),
            // `-1` would lex as a single negative literal
            UnaryOperator::Minus
                if matches!(unary.operand, ExpressionNode::Literal(_))
                    && operand.starts_with(|ch: char| ch.is_ascii_digit()) =>
            {
                format!("- {operand}")
            }
            UnaryOperator::Minus => format!("-{operand}"),
        }
    }

    fn visit_binary(&mut self, binary: &BinaryData, left: String, right: String) -> String {
        let priority = binary.op.priority();
        let left = if binding_priority(&binary.left) < priority {
            parenthesize(left)
        } else {
            left
        };
        let right = if binding_priority(&binary.right) <= priority {
            parenthesize(right)
        } else {
            right
        };
        format!("{left} {} {right}", binary.op)
    }

    fn visit_method(&mut self, method: &MethodData, args: Vec<String>) -> String {
        format!("{}({})", method.method, args.join(","))
    }
}
