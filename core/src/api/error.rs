//! Error types for the public API.

use thiserror::Error;

use crate::compiler::CompileError;
use crate::parser::{ParseError, Span};
use crate::registry::RegistryError;

/// Errors that can occur when using the statexpr API.
#[derive(Debug, Error)]
pub enum Error {
    /// Unusable engine options, reported when the engine is built.
    #[error("API error: {0}")]
    Api(String),

    /// The formula was rejected.
    ///
    /// `formula` is the source text the diagnostic spans point into.
    #[error("{}", summarize(.diagnostics))]
    Compilation {
        diagnostics: Vec<Diagnostic>,
        formula: String,
    },

    /// A custom operator or function could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl Error {
    /// Attach the formula text to a compilation error that lacks it.
    pub fn with_formula(self, source: &str) -> Self {
        match self {
            Error::Compilation {
                diagnostics,
                formula,
            } if formula.is_empty() => Error::Compilation {
                diagnostics,
                formula: source.to_string(),
            },
            other => other,
        }
    }

    /// Diagnostics carried by a compilation error, empty for other kinds.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => "Compilation failed".to_string(),
        [only] => format!("Compilation error: {}", only.message),
        [first, rest @ ..] => format!(
            "Compilation error: {} (and {} more)",
            first.message,
            rest.len()
        ),
    }
}

/// An error message with location. Every diagnostic rejects the formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    /// Byte range into the formula.
    pub span: Span,
    pub help: Vec<String>,
    /// Stable error code (e.g. "P002").
    pub code: Option<String>,
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            formula: err.formula,
        }
    }
}

/// The bytecode compiler never sees the source text, so the formula is left
/// empty. Use [`Error::with_formula`] to fill it in.
impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            formula: String::new(),
        }
    }
}
