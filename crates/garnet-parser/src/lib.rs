//! Grammar engine for the Garnet Ruby front end.
//!
//! [`parse`] and [`parse_with`] run the scanner and the [`Parser`] in one
//! step. They return the program's `Root` node, or the first diagnostic the
//! scanner or the grammar raised.
//!
//! ```rust
//! use garnet_parser::parse;
//! use garnet_syntax::{Node, NodeType};
//!
//! let Node::Root(root) = parse("demo.rb", "a.b = 1").unwrap() else {
//!     unreachable!("parse always returns a Root node")
//! };
//! assert!(root.body_node().unwrap().is(NodeType::AttrAssign));
//! ```

pub mod config;
pub mod parser;

pub use config::ParserConfig;
pub use parser::Parser;

use garnet_lexer::Lexer;
use garnet_syntax::ast::Node;
use garnet_syntax::error::Result;

/// Parses UTF-8 `source` as the contents of `file`.
pub fn parse(file: &str, source: &str) -> Result<Node> {
    parse_with(&ParserConfig::new(file), source.as_bytes())
}

/// Parses raw source bytes; the encoding is chosen by the magic comment.
pub fn parse_with(config: &ParserConfig, source: &[u8]) -> Result<Node> {
    let tokens = Lexer::with_line(config.file(), source, config.line()).tokenize()?;
    Parser::new(config.file(), tokens)
        .with_max_depth(config.max_depth())
        .parse_program()
}
