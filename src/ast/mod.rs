//! Expression tree types for `$filter` and `$orderby` expressions

mod expression;
mod operator;
mod visitor;

pub use expression::*;
pub use operator::*;
pub use visitor::*;
