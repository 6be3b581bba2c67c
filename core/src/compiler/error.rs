//! Bytecode compilation errors.

use thiserror::Error;

use crate::api::Diagnostic;
use crate::parser::Span;

/// Errors that can occur during bytecode compilation.
///
/// These are resource limits that only very large formulas reach, plus
/// trees the parser would never produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Constant pool outgrew a 16-bit index
    #[error("Too many constants (limit: {limit})")]
    TooManyConstants { limit: usize },

    /// An adapter table outgrew a 16-bit index
    #[error("Too many distinct operators or functions (limit: {limit})")]
    TooManyAdapters { limit: usize },

    /// The program does not leave exactly one value on the stack
    #[error("Unbalanced stack: {depth} value(s) left at return")]
    UnbalancedStack { depth: usize },

    /// Boolean nodes have no numeric value to compile
    #[error("Boolean value '{text}' cannot be compiled to a numeric program")]
    BooleanValue { text: String },
}

impl CompileError {
    /// Convert to a Diagnostic for API boundary.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.to_string(),
            span: Span::new(0, 0),
            help: Vec::new(),
            code: Some(
                match self {
                    CompileError::TooManyConstants { .. } => "C001",
                    CompileError::TooManyAdapters { .. } => "C002",
                    CompileError::UnbalancedStack { .. } => "C003",
                    CompileError::BooleanValue { .. } => "C004",
                }
                .to_string(),
            ),
        }
    }
}
