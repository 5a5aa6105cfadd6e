//! Shared vocabulary of the Garnet front end: source spans, tokens, the
//! syntax tree with its visitor, and the diagnostic taxonomy.

pub mod ast;
pub mod error;
pub mod span;
pub mod token;
pub mod visitor;
pub mod walk;

pub use ast::*;
pub use error::*;
pub use span::Span;
pub use token::*;
pub use visitor::Visitor;
