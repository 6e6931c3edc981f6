//! Operator, method and sort order identities

use std::fmt;

/// Category label of an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// `and`, `or`, `not`
    Logical,
    /// `eq`, `ne`
    Equality,
    /// `lt`, `le`, `gt`, `ge`
    Relational,
    /// `add`, `sub`
    Additive,
    /// `mul`, `div`, `mod`
    Multiplicative,
    /// Unary `-`
    Arithmetic,
    /// `/`
    Member,
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OperatorCategory::Logical => "Logical",
            OperatorCategory::Equality => "Equality",
            OperatorCategory::Relational => "Relational",
            OperatorCategory::Additive => "Additive",
            OperatorCategory::Multiplicative => "Multiplicative",
            OperatorCategory::Arithmetic => "Arithmetic",
            OperatorCategory::Member => "Member",
        };
        f.write_str(label)
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Logical and
    And,
    /// Logical or
    Or,
    /// Equal
    Eq,
    /// Not equal
    Ne,
    /// Less than
    Lt,
    /// Less or equal
    Le,
    /// Greater than
    Gt,
    /// Greater or equal
    Ge,
    /// Addition
    Add,
    /// Subtraction
    Sub,
    /// Multiplication
    Mul,
    /// Division
    Div,
    /// Modulo
    Mod,
    /// Member access `/`
    PropertyAccess,
}

impl BinaryOperator {
    /// All binary operators
    pub const ALL: [BinaryOperator; 14] = [
        Self::And,
        Self::Or,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::PropertyAccess,
    ];

    /// Text of the operator in a URI
    pub const fn uri_literal(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::PropertyAccess => "/",
        }
    }

    /// Binding priority; higher binds tighter
    pub const fn priority(self) -> u8 {
        match self {
            Self::PropertyAccess => 100,
            Self::Mul | Self::Div | Self::Mod => 60,
            Self::Add | Self::Sub => 50,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 40,
            Self::Eq | Self::Ne => 30,
            Self::And => 20,
            Self::Or => 10,
        }
    }

    /// Category label
    pub const fn category(self) -> OperatorCategory {
        match self {
            Self::And | Self::Or => OperatorCategory::Logical,
            Self::Eq | Self::Ne => OperatorCategory::Equality,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => OperatorCategory::Relational,
            Self::Add | Self::Sub => OperatorCategory::Additive,
            Self::Mul | Self::Div | Self::Mod => OperatorCategory::Multiplicative,
            Self::PropertyAccess => OperatorCategory::Member,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_literal())
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Logical negation `not`
    Not,
    /// Arithmetic negation `-`
    Minus,
}

impl UnaryOperator {
    /// Text of the operator in a URI
    pub const fn uri_literal(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Minus => "-",
        }
    }

    /// Category label
    pub const fn category(self) -> OperatorCategory {
        match self {
            Self::Not => OperatorCategory::Logical,
            Self::Minus => OperatorCategory::Arithmetic,
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_literal())
    }
}

/// Built-in methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodOperator {
    EndsWith,
    IndexOf,
    StartsWith,
    ToLower,
    ToUpper,
    Trim,
    Substring,
    SubstringOf,
    Concat,
    Length,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Round,
    Floor,
    Ceiling,
}

impl MethodOperator {
    /// All methods
    pub const ALL: [MethodOperator; 19] = [
        Self::EndsWith,
        Self::IndexOf,
        Self::StartsWith,
        Self::ToLower,
        Self::ToUpper,
        Self::Trim,
        Self::Substring,
        Self::SubstringOf,
        Self::Concat,
        Self::Length,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Round,
        Self::Floor,
        Self::Ceiling,
    ];

    /// Method name in a URI
    pub const fn uri_literal(self) -> &'static str {
        match self {
            Self::EndsWith => "endswith",
            Self::IndexOf => "indexof",
            Self::StartsWith => "startswith",
            Self::ToLower => "tolower",
            Self::ToUpper => "toupper",
            Self::Trim => "trim",
            Self::Substring => "substring",
            Self::SubstringOf => "substringof",
            Self::Concat => "concat",
            Self::Length => "length",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
        }
    }
}

impl fmt::Display for MethodOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_literal())
    }
}

/// Sort direction of an `$orderby` item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// `asc` (default)
    #[default]
    Asc,
    /// `desc`
    Desc,
}

impl SortOrder {
    /// Keyword in a URI
    pub const fn uri_literal(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parse a sort keyword
    pub fn from_uri_literal(literal: &str) -> Option<Self> {
        match literal {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_literal())
    }
}
