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

//! Expression tree produced by the filter and order-by parsers

use super::operator::{BinaryOperator, MethodOperator, SortOrder, UnaryOperator};
use super::visitor::{UriRenderer, walk_expression};
use crate::model::{EdmProperty, EdmType, LiteralValue};
use smallvec::SmallVec;

/// Method argument list
pub type MethodArgs = SmallVec<[ExpressionNode; 4]>;

/// Node kind discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    /// Typed literal
    Literal,
    /// Property reference
    Property,
    /// Member access `a/b`
    Member,
    /// Unary operation
    Unary,
    /// Binary operation
    Binary,
    /// Method call
    Method,
}

/// Literal node data
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralData {
    /// Literal text exactly as written
    pub uri_literal: String,
    /// Parsed value
    pub value: LiteralValue,
    /// Type of the literal
    pub edm_type: Option<EdmType>,
    /// Offset of the literal in the expression string
    pub position: usize,
}

/// Property node data
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyData {
    /// Property name as written
    pub name: String,
    /// Resolved property, absent when parsing without a resource type
    pub property: Option<EdmProperty>,
    /// Declared type of the resolved property
    pub edm_type: Option<EdmType>,
    /// Offset of the property name
    pub position: usize,
}

/// Member access node data
#[derive(Debug, Clone, PartialEq)]
pub struct MemberData {
    /// Path on the left of `/`
    pub source: ExpressionNode,
    /// Property on the right of `/`
    pub path: ExpressionNode,
    /// Type of the path property
    pub edm_type: Option<EdmType>,
    /// Offset of the `/` token
    pub position: usize,
}

/// Unary node data
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryData {
    pub op: UnaryOperator,
    pub operand: ExpressionNode,
    pub edm_type: Option<EdmType>,
    /// Offset of the operator token
    pub position: usize,
}

/// Binary node data
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryData {
    pub op: BinaryOperator,
    pub left: ExpressionNode,
    pub right: ExpressionNode,
    pub edm_type: Option<EdmType>,
    /// Offset of the operator token
    pub position: usize,
}

/// Method call node data
#[derive(Debug, Clone, PartialEq)]
pub struct MethodData {
    pub method: MethodOperator,
    pub args: MethodArgs,
    pub edm_type: Option<EdmType>,
    /// Offset of the method name
    pub position: usize,
}

/// A node of the expression tree
///
/// Every variant carries its resolved EDM type (absent in untyped mode) and
/// the offset of the token it was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    /// Typed literal such as `'abc'`, `12L` or `datetime'2012-02-29T12:00'`
    Literal(LiteralData),
    /// Property reference
    Property(PropertyData),
    /// Member access `source/path`
    Member(Box<MemberData>),
    /// `not x` or `-x`
    Unary(Box<UnaryData>),
    /// `left op right`
    Binary(Box<BinaryData>),
    /// `method(args...)`
    Method(Box<MethodData>),
}

impl ExpressionNode {
    /// Create an untyped literal node
    pub fn literal(uri_literal: impl Into<String>, value: LiteralValue, position: usize) -> Self {
        let edm_type = Some(EdmType::Simple(value.kind()));
        ExpressionNode::Literal(LiteralData {
            uri_literal: uri_literal.into(),
            value,
            edm_type,
            position,
        })
    }

    /// Create an unresolved property node
    pub fn property(name: impl Into<String>, position: usize) -> Self {
        ExpressionNode::Property(PropertyData {
            name: name.into(),
            property: None,
            edm_type: None,
            position,
        })
    }

    /// Create an untyped member node
    pub fn member(source: ExpressionNode, path: ExpressionNode, position: usize) -> Self {
        ExpressionNode::Member(Box::new(MemberData {
            source,
            path,
            edm_type: None,
            position,
        }))
    }

    /// Create an untyped unary node
    pub fn unary(op: UnaryOperator, operand: ExpressionNode, position: usize) -> Self {
        ExpressionNode::Unary(Box::new(UnaryData {
            op,
            operand,
            edm_type: None,
            position,
        }))
    }

    /// Create an untyped binary node
    pub fn binary(
        op: BinaryOperator,
        left: ExpressionNode,
        right: ExpressionNode,
        position: usize,
    ) -> Self {
        ExpressionNode::Binary(Box::new(BinaryData {
            op,
            left,
            right,
            edm_type: None,
            position,
        }))
    }

    /// Create an untyped method node
    pub fn method(method: MethodOperator, args: MethodArgs, position: usize) -> Self {
        ExpressionNode::Method(Box::new(MethodData {
            method,
            args,
            edm_type: None,
            position,
        }))
    }

    /// Node kind
    pub fn kind(&self) -> ExpressionKind {
        match self {
            ExpressionNode::Literal(_) => ExpressionKind::Literal,
            ExpressionNode::Property(_) => ExpressionKind::Property,
            ExpressionNode::Member(_) => ExpressionKind::Member,
            ExpressionNode::Unary(_) => ExpressionKind::Unary,
            ExpressionNode::Binary(_) => ExpressionKind::Binary,
            ExpressionNode::Method(_) => ExpressionKind::Method,
        }
    }

    /// Resolved EDM type
    pub fn edm_type(&self) -> Option<&EdmType> {
        match self {
            ExpressionNode::Literal(data) => data.edm_type.as_ref(),
            ExpressionNode::Property(data) => data.edm_type.as_ref(),
            ExpressionNode::Member(data) => data.edm_type.as_ref(),
            ExpressionNode::Unary(data) => data.edm_type.as_ref(),
            ExpressionNode::Binary(data) => data.edm_type.as_ref(),
            ExpressionNode::Method(data) => data.edm_type.as_ref(),
        }
    }

    /// Replace the resolved EDM type
    pub fn set_edm_type(&mut self, edm_type: Option<EdmType>) {
        let slot = match self {
            ExpressionNode::Literal(data) => &mut data.edm_type,
            ExpressionNode::Property(data) => &mut data.edm_type,
            ExpressionNode::Member(data) => &mut data.edm_type,
            ExpressionNode::Unary(data) => &mut data.edm_type,
            ExpressionNode::Binary(data) => &mut data.edm_type,
            ExpressionNode::Method(data) => &mut data.edm_type,
        };
        *slot = edm_type;
    }

    /// Offset of the token this node was built from
    pub fn position(&self) -> usize {
        match self {
            ExpressionNode::Literal(data) => data.position,
            ExpressionNode::Property(data) => data.position,
            ExpressionNode::Member(data) => data.position,
            ExpressionNode::Unary(data) => data.position,
            ExpressionNode::Binary(data) => data.position,
            ExpressionNode::Method(data) => data.position,
        }
    }

    /// Text of the token this node was built from
    ///
    /// This is the literal text, the property name, the operator symbol or
    /// the method name. Use [`to_uri`](Self::to_uri) for the whole subtree.
    pub fn uri_literal(&self) -> &str {
        match self {
            ExpressionNode::Literal(data) => &data.uri_literal,
            ExpressionNode::Property(data) => &data.name,
            ExpressionNode::Member(_) => BinaryOperator::PropertyAccess.uri_literal(),
            ExpressionNode::Unary(data) => data.op.uri_literal(),
            ExpressionNode::Binary(data) => data.op.uri_literal(),
            ExpressionNode::Method(data) => data.method.uri_literal(),
        }
    }

    /// Render the subtree back to URI syntax
    pub fn to_uri(&self) -> String {
        walk_expression(&mut UriRenderer, self)
    }

    /// Check if this is a property or member access
    pub fn is_property_path(&self) -> bool {
        matches!(self, ExpressionNode::Property(_) | ExpressionNode::Member(_))
    }
}

/// Result of parsing a `$filter` expression
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpression {
    /// Expression string as passed to the parser
    pub expression_string: String,
    /// Root node; `None` for an empty expression
    pub root: Option<ExpressionNode>,
}

impl FilterExpression {
    /// Type of the root node
    pub fn edm_type(&self) -> Option<&EdmType> {
        self.root.as_ref().and_then(ExpressionNode::edm_type)
    }

    /// Check for an empty expression
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

/// One `$orderby` item
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExpression {
    pub expression: ExpressionNode,
    pub sort_order: SortOrder,
}

/// Result of parsing an `$orderby` expression
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpression {
    /// Expression string as passed to the parser
    pub expression_string: String,
    /// Sort items in order of significance
    pub orders: Vec<OrderExpression>,
}
