mod error;
mod node;
#[allow(clippy::module_inception)]
mod parser;
mod syntax;
pub mod term;

pub use error::{ParseError, ParseErrorKind};
pub use node::{Node, PostOrder};
pub use parser::{ParsedFormula, parse};
pub use syntax::Span;
pub use term::{Term, TermKind, TermReader};

#[cfg(test)]
mod parse_test;
