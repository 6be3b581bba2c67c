//! Configuration options for the statexpr engine.

use super::Error;
use crate::registry::{Registry, is_valid_identifier, is_valid_symbol_char};

/// Options controlling how formulas are read.
///
/// # Example
///
/// ```
/// use statexpr_core::api::ParseOptions;
///
/// let options = ParseOptions {
///     decimal_separator: '.',
///     ..ParseOptions::default()
/// };
/// assert_eq!(options.input_name, "In");
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name of the single input variable. Case-sensitive.
    ///
    /// Default: `"In"`
    pub input_name: String,

    /// Decimal separator accepted in numeric literals in addition to `.`.
    ///
    /// Default: `','`
    pub decimal_separator: char,

    /// Maximum nesting of groups and argument lists. The top level counts
    /// as one, so the default admits 63 nested groups.
    ///
    /// The parser recurses once per level; the bound keeps that recursion
    /// within a 2 MiB thread stack. Long operator chains are not affected.
    ///
    /// Default: 64
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            input_name: "In".to_string(),
            decimal_separator: ',',
            max_depth: 64,
        }
    }
}

impl ParseOptions {
    /// Check the options against the registry they will be used with.
    ///
    /// A decimal separator other than `.` or `,` must not be claimed by
    /// another kind of term: letters, digits, whitespace, `_ ( ) ;` and
    /// every operator character of `registry` are rejected.
    pub fn validate(&self, registry: &Registry) -> Result<(), Error> {
        if !is_valid_identifier(&self.input_name) {
            return Err(Error::Api(format!("invalid input name '{}'", self.input_name)));
        }

        let separator = self.decimal_separator;
        let reserved = !matches!(separator, '.' | ',')
            && (!is_valid_symbol_char(separator) || registry.is_operator_char(separator));
        if reserved {
            return Err(Error::Api(format!(
                "'{}' cannot be used as the decimal separator",
                separator.escape_default()
            )));
        }

        if self.max_depth == 0 {
            return Err(Error::Api("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Execution strategy for a compiled formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Direct evaluation of the expression tree.
    #[default]
    Tree,
    /// Stack-machine bytecode.
    Bytecode,
}

/// Configuration options for compilation.
#[derive(Debug, Clone, Default)]
pub struct CompilationOptions {
    pub backend: Backend,
}

/// Configuration options for the statexpr engine.
///
/// The compilation options are defaults that can be overridden on a
/// per-call basis with [`Engine::compile_with`](super::Engine::compile_with).
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub parse: ParseOptions,

    /// Default options for compilation.
    pub default_compilation_options: CompilationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_separator(decimal_separator: char) -> ParseOptions {
        ParseOptions {
            decimal_separator,
            ..ParseOptions::default()
        }
    }

    #[test]
    fn test_default_options_are_valid() {
        assert!(ParseOptions::default().validate(Registry::global()).is_ok());
        assert!(with_separator('.').validate(Registry::global()).is_ok());
        assert!(with_separator('\'').validate(Registry::global()).is_ok());
    }

    #[test]
    fn test_reserved_separators_rejected() {
        for separator in [';', '(', ')', '+', '-', '*', '/', 'a', '7', '_', ' '] {
            let result = with_separator(separator).validate(Registry::global());
            assert!(
                matches!(result, Err(Error::Api(_))),
                "{separator:?} accepted"
            );
        }
    }

    #[test]
    fn test_separator_checked_against_registry() {
        let mut registry = Registry::builtin();
        assert!(with_separator('%').validate(&registry).is_ok());

        registry
            .register_operator(crate::registry::OperatorDescriptor::binary("%", 3, |a, b| a % b))
            .unwrap();
        assert!(with_separator('%').validate(&registry).is_err());
    }

    #[test]
    fn test_input_name_and_depth_checked() {
        for input_name in ["", "42", "true", "a b", "x+"] {
            let options = ParseOptions {
                input_name: input_name.to_string(),
                ..ParseOptions::default()
            };
            assert!(options.validate(Registry::global()).is_err(), "{input_name:?} accepted");
        }

        let options = ParseOptions {
            max_depth: 0,
            ..ParseOptions::default()
        };
        let err = options.validate(Registry::global()).unwrap_err();
        assert_eq!(err.to_string(), "API error: max_depth must be at least 1");
    }
}
