//! statexpr - single-input arithmetic formulas compiled to numeric callables
//!
//! # Overview
//!
//! A formula is one arithmetic expression over a numeric input variable
//! (`In` by default), decimal literals, parenthesised groups, the operators
//! `+ - * /` and unary `-`, and calls such as `Max(In; 0)`. Compiling a
//! formula yields a callable mapping one `f64` to another.
//!
//! # Quick Start
//!
//! ```
//! use bumpalo::Bump;
//! use statexpr::{Engine, EngineOptions};
//!
//! // The arena holds the parsed expression trees.
//! let arena = Bump::new();
//! let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
//!
//! let formula = engine.compile("(In + 2) * 1,5").unwrap();
//! assert_eq!(formula.call(2.0), 6.0);
//! ```
//!
//! # Extending the language
//!
//! Operators and functions live in a [`Registry`]. Start from the built-in
//! catalog and register more before handing it to the engine:
//!
//! ```
//! use bumpalo::Bump;
//! use statexpr::{Engine, EngineOptions, FunctionDescriptor, Registry, register_math_extras};
//!
//! let mut registry = Registry::builtin();
//! register_math_extras(&mut registry).unwrap();
//! registry
//!     .register_function(FunctionDescriptor::variadic("Sum", |args| {
//!         args.iter().fold(0.0, |a, b| a + b)
//!     }))
//!     .unwrap();
//!
//! let arena = Bump::new();
//! let engine = Engine::with_registry(&arena, &registry, EngineOptions::default()).unwrap();
//! let formula = engine.compile("Clamp(Sum(In; 1; 2); 0; 10)").unwrap();
//! assert_eq!(formula.call(20.0), 10.0);
//! ```
//!
//! # Errors
//!
//! Rejected formulas produce an [`Error::Compilation`] whose diagnostics
//! point into the formula. [`render_error_to_string`] formats them with
//! source snippets.

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from statexpr_core
pub use statexpr_core::api::{
    Backend, CompilationOptions, CompiledFormula, Diagnostic, Engine, EngineOptions, Error,
    ParseOptions,
};

// Re-export the extension points
pub use statexpr_core::registry::{
    Fixity, FunctionArity, FunctionDescriptor, OperatorArity, OperatorDescriptor, Registry,
    RegistryError,
};
pub use statexpr_core::stdlib::register_math_extras;

// Re-export the expression model
pub use statexpr_core::parser::{Node, ParseError, ParseErrorKind, ParsedFormula, Span};
