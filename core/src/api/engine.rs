//! The statexpr compilation engine.

use bumpalo::Bump;
use tracing::debug;

use super::{Backend, CompilationOptions, CompiledFormula, EngineOptions, Error};
use crate::compiler::BytecodeCompiler;
use crate::parser::{self, ParseError, ParseErrorKind, ParsedFormula, Span};
use crate::registry::Registry;

/// The statexpr compilation engine.
///
/// The engine ties together:
/// - the operator and function registry the formulas are resolved against
/// - the arena holding every parsed expression tree
/// - the parse and compilation options
///
/// # Lifetimes
///
/// - `'a`: Lifetime of the arena and of the registry. Compiled formulas
///   borrow from both.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use statexpr_core::api::{Engine, EngineOptions};
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
///
/// let formula = engine.compile("Max(In; 0) * 2").unwrap();
/// assert_eq!(formula.call(3.0), 6.0);
/// assert_eq!(formula.call(-3.0), 0.0);
/// ```
pub struct Engine<'a> {
    arena: &'a Bump,
    registry: &'a Registry,
    options: EngineOptions,
}

impl<'a> Engine<'a> {
    /// Create an engine over the built-in operators and functions.
    ///
    /// Fails with [`Error::Api`] when the parse options are unusable; see
    /// [`ParseOptions::validate`](super::ParseOptions::validate).
    pub fn new(arena: &'a Bump, options: EngineOptions) -> Result<Self, Error> {
        Self::with_registry(arena, Registry::global(), options)
    }

    /// Create an engine over a custom registry. The parse options are
    /// validated against `registry`.
    ///
    /// # Example
    ///
    /// ```
    /// use bumpalo::Bump;
    /// use statexpr_core::api::{Engine, EngineOptions};
    /// use statexpr_core::registry::{OperatorDescriptor, Registry};
    ///
    /// let mut registry = Registry::builtin();
    /// registry
    ///     .register_operator(OperatorDescriptor::binary("^", 1, f64::powf))
    ///     .unwrap();
    ///
    /// let arena = Bump::new();
    /// let engine = Engine::with_registry(&arena, &registry, EngineOptions::default()).unwrap();
    /// assert_eq!(engine.compile("2 * In ^ 2").unwrap().call(3.0), 18.0);
    /// ```
    pub fn with_registry(
        arena: &'a Bump,
        registry: &'a Registry,
        options: EngineOptions,
    ) -> Result<Self, Error> {
        options.parse.validate(registry)?;
        Ok(Self {
            arena,
            registry,
            options,
        })
    }

    /// Access the registry formulas are resolved against.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Parse a formula without compiling it.
    ///
    /// Unlike [`compile`](Self::compile), a boolean result is accepted here.
    pub fn parse(&self, source: &str) -> Result<ParsedFormula<'a>, Error> {
        let source: &'a str = self.arena.alloc_str(source);
        Ok(parser::parse(
            self.arena,
            self.registry,
            &self.options.parse,
            source,
        )?)
    }

    /// Compile a formula with the engine's default compilation options.
    pub fn compile(&self, source: &str) -> Result<CompiledFormula<'a>, Error> {
        self.compile_with(&self.options.default_compilation_options, source)
    }

    /// Compile a formula with explicit compilation options.
    pub fn compile_with(
        &self,
        options: &CompilationOptions,
        source: &str,
    ) -> Result<CompiledFormula<'a>, Error> {
        let parsed = self.parse(source)?;

        if !parsed.is_numeric() {
            return Err(boolean_result(parsed.source).into());
        }

        let formula = match options.backend {
            Backend::Tree => CompiledFormula::tree(parsed.source, parsed.root),
            Backend::Bytecode => {
                let code = BytecodeCompiler::compile(parsed.root)
                    .map_err(|err| Error::from(err).with_formula(parsed.source))?;
                CompiledFormula::bytecode(parsed.source, parsed.root, code)
            }
        };

        debug!(formula = parsed.source, backend = ?options.backend, "compiled formula");
        Ok(formula)
    }
}

/// The whole formula reduced to a boolean, which has no numeric callable.
fn boolean_result(source: &str) -> ParseError {
    let start = source.len() - source.trim_start().len();
    let end = source.trim_end().len().max(start);
    ParseError::new(
        ParseErrorKind::TypeMismatch {
            text: source[start..end].to_string(),
        },
        source,
        Span::new(start, end),
    )
}
