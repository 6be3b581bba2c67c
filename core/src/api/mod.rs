//! Public API for the statexpr formula language.
//!
//! This module provides the stable entry points for compiling formulas into
//! numeric callables. Everything below it ([`crate::parser`],
//! [`crate::evaluator`], [`crate::vm`]) can be used directly, but the engine
//! is the supported path:
//!
//! 1. **Parse**: resolve terms against the registry and reduce them to one
//!    expression tree (`Engine::parse`)
//! 2. **Compile**: check the result is numeric and pick a backend
//!    (`Engine::compile`, `Engine::compile_with`)
//! 3. **Call**: map an input to an output (`CompiledFormula::call`)
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use statexpr_core::api::{Backend, CompilationOptions, Engine, EngineOptions};
//!
//! let arena = Bump::new();
//! let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
//!
//! let tree = engine.compile("(2 + 3) * In").unwrap();
//! let bytecode = engine
//!     .compile_with(&CompilationOptions { backend: Backend::Bytecode }, "(2 + 3) * In")
//!     .unwrap();
//! assert_eq!(tree.call(4.0), 20.0);
//! assert_eq!(bytecode.call(4.0), 20.0);
//! ```

pub mod engine;
pub mod error;
pub mod formula;
pub mod options;

pub use engine::Engine;
pub use error::{Diagnostic, Error};
pub use formula::CompiledFormula;
pub use options::{Backend, CompilationOptions, EngineOptions, ParseOptions};
