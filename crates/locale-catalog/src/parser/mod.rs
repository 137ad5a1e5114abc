//! Parsers for catalog files and message templates.
//!
//! Catalog files are decoded with the codec matching the store's format into a
//! [`MessageTree`](crate::MessageTree). Leaf messages are parsed on demand into a
//! [`Template`] of literal text and `{name}` placeholders.

pub mod ast;
mod catalog;
pub mod error;
mod template;

pub use ast::*;
pub use catalog::parse_catalog;
pub use error::ParseError;
pub use template::parse_template;
