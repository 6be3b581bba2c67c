use thiserror::Error;

use crate::api::Diagnostic;
use crate::parser::Span;
use crate::registry::Fixity;

/// Parser error with the offending span
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub formula: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// A character no term can start with
    #[error("Unexpected character '{found}'")]
    Lexical { found: char },

    /// Parenthesis depth never returns to zero, or a stray ')'
    #[error("Unbalanced parenthesis")]
    UnbalancedGroup,

    /// No prefix of an operator-character run is a registered symbol
    #[error("Unknown operator '{symbol}'")]
    UnknownOperator { symbol: String },

    /// The symbol has no descriptor of the fixity its position requires
    #[error("Operator '{symbol}' has no {wanted} form")]
    AmbiguousOperator { symbol: String, wanted: Fixity },

    /// Invalid number literal
    #[error("Invalid number literal '{text}'")]
    MalformedNumber { text: String },

    /// Neither the input variable nor a registered function
    #[error("Unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    /// Argument count differs from the function's declared arity
    #[error("Function '{name}' expects {expected} argument(s), found {found}")]
    FunctionArity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// An operator still lacks an operand after the frame is drained
    #[error("Operator '{symbol}' is missing an operand")]
    MissingOperand { symbol: String },

    /// More than one operand is left once the frame is drained
    #[error("Unexpected operand '{text}'")]
    ExtraOperand { text: String },

    /// Nothing but whitespace at the top level
    #[error("Empty formula")]
    EmptyFormula,

    /// `;` outside of a function argument list
    #[error("Argument separator outside of a function call")]
    UnexpectedSeparator,

    /// A function name not followed by `(`
    #[error("Function '{name}' must be followed by an argument list")]
    MissingArguments { name: String },

    /// A boolean used where a number is required
    #[error("Type mismatch: expected a number, found boolean '{text}'")]
    TypeMismatch { text: String },

    /// Groups and argument lists nested deeper than `max_depth`
    #[error("Expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },
}

impl ParseErrorKind {
    /// Stable code for documentation lookup.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::Lexical { .. } => "P001",
            ParseErrorKind::UnbalancedGroup => "P002",
            ParseErrorKind::UnknownOperator { .. } => "P003",
            ParseErrorKind::AmbiguousOperator { .. } => "P004",
            ParseErrorKind::MalformedNumber { .. } => "P005",
            ParseErrorKind::UnknownIdentifier { .. } => "P006",
            ParseErrorKind::FunctionArity { .. } => "P007",
            ParseErrorKind::MissingOperand { .. } => "P008",
            ParseErrorKind::ExtraOperand { .. } => "P009",
            ParseErrorKind::EmptyFormula => "P010",
            ParseErrorKind::UnexpectedSeparator => "P011",
            ParseErrorKind::MissingArguments { .. } => "P012",
            ParseErrorKind::TypeMismatch { .. } => "P013",
            ParseErrorKind::MaxDepthExceeded { .. } => "P014",
        }
    }

    /// The frame did not reduce to exactly one operand.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParseErrorKind::MissingOperand { .. }
                | ParseErrorKind::ExtraOperand { .. }
                | ParseErrorKind::EmptyFormula
                | ParseErrorKind::UnexpectedSeparator
        )
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            ParseErrorKind::UnbalancedGroup => Some("Add the missing parenthesis"),
            ParseErrorKind::MalformedNumber { .. } => {
                Some("Use a single decimal separator, either '.' or ','")
            }
            ParseErrorKind::FunctionArity { .. } => Some("Separate arguments with ';'"),
            ParseErrorKind::MissingOperand { .. } => {
                Some("Every binary operator needs a value on both sides")
            }
            ParseErrorKind::ExtraOperand { .. } => Some("Join values with an operator"),
            ParseErrorKind::MaxDepthExceeded { .. } => {
                Some("Reduce the nesting of parentheses and function calls")
            }
            _ => None,
        }
    }
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, formula: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            formula: formula.into(),
            span,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            message: self.kind.to_string(),
            span: self.span.clone(),
            help: self.kind.help().map(str::to_string).into_iter().collect(),
            code: Some(self.kind.code().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_to_diagnostic() {
        let error = ParseError::new(
            ParseErrorKind::FunctionArity {
                name: "Max".to_string(),
                expected: 2,
                found: 1,
            },
            "Max(1)",
            Span(0..6),
        );

        let diagnostic = error.to_diagnostic();
        assert_eq!(
            diagnostic.message,
            "Function 'Max' expects 2 argument(s), found 1"
        );
        assert_eq!(diagnostic.code, Some("P007".to_string()));
        assert_eq!(diagnostic.help.len(), 1);
    }

    #[test]
    fn test_display_includes_span() {
        let error = ParseError::new(ParseErrorKind::Lexical { found: '#' }, "1 # 2", Span(2..3));
        assert_eq!(error.to_string(), "Unexpected character '#' at 2..3");
    }

    #[test]
    fn test_structural_family() {
        assert!(ParseErrorKind::EmptyFormula.is_structural());
        assert!(
            ParseErrorKind::MissingOperand {
                symbol: "+".to_string()
            }
            .is_structural()
        );
        assert!(!ParseErrorKind::UnbalancedGroup.is_structural());
    }
}
