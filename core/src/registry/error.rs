//! Errors raised while extending a [`Registry`](super::Registry).

use thiserror::Error;

use super::Fixity;

/// Rejected registration.
///
/// The registry is left untouched when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A descriptor with the same symbol and fixity already exists.
    #[error("operator '{symbol}' is already registered as {fixity}")]
    DuplicateOperator { symbol: String, fixity: Fixity },

    /// A function with the same name already exists.
    #[error("function '{name}' is already registered")]
    DuplicateFunction { name: String },

    /// The symbol is empty or contains a character the tokenizer reserves
    /// for numbers, identifiers, groups or separators.
    #[error("'{symbol}' is not a valid operator symbol")]
    InvalidSymbol { symbol: String },

    /// The name is not an identifier, or collides with a boolean literal.
    #[error("'{name}' is not a valid function name")]
    InvalidName { name: String },

    /// `u32::MAX` is the threshold of the final drain.
    #[error("operator '{symbol}' uses the reserved precedence {precedence}")]
    ReservedPrecedence { symbol: String, precedence: u32 },
}
