//! Tokenizer and parsers for `$filter` and `$orderby` expressions
//!
//! ```
//! use odata_filter::parser::{parse_filter, parse_order_by};
//!
//! let filter = parse_filter("substringof('Walter', EmployeeName)").unwrap();
//! assert!(filter.root.is_some());
//!
//! let order_by = parse_order_by("Age desc, EmployeeName").unwrap();
//! assert_eq!(order_by.orders.len(), 2);
//! ```

pub mod error;
pub mod filter_parser;
pub mod orderby_parser;
mod reader;
pub mod tokenizer;

pub use error::{ParseError, ParseErrorKind, ParseResult, TokenizerError};
pub use filter_parser::{FilterParser, parse_filter};
pub use orderby_parser::parse_order_by;
pub use tokenizer::{Token, TokenKind, TokenList, Tokenizer, tokenize};
