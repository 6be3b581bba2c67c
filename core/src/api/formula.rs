//! Compiled statexpr formulas.

use core::fmt;

use super::Backend;
use crate::evaluator;
use crate::parser::Node;
use crate::vm::{Code, VM};

/// How a compiled formula is executed.
#[derive(Clone)]
enum Program {
    Tree,
    Bytecode(Code),
}

/// A formula compiled to a function of one numeric input.
///
/// Compiled formulas borrow their expression tree from the engine's arena
/// and can be called any number of times. Calls never fail: domain errors
/// follow IEEE 754 (`1 / 0` is infinity, `0 / 0` is NaN).
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use statexpr_core::api::{Engine, EngineOptions};
///
/// let arena = Bump::new();
/// let engine = Engine::new(&arena, EngineOptions::default()).unwrap();
/// let formula = engine.compile("Abs(In - 10)").unwrap();
///
/// let f = formula.as_fn();
/// let outputs: Vec<f64> = [4.0, 12.0].into_iter().map(f).collect();
/// assert_eq!(outputs, vec![6.0, 2.0]);
/// ```
#[derive(Clone)]
pub struct CompiledFormula<'a> {
    source: &'a str,
    root: &'a Node<'a>,
    program: Program,
}

impl<'a> CompiledFormula<'a> {
    pub(crate) fn tree(source: &'a str, root: &'a Node<'a>) -> Self {
        Self {
            source,
            root,
            program: Program::Tree,
        }
    }

    pub(crate) fn bytecode(source: &'a str, root: &'a Node<'a>, code: Code) -> Self {
        Self {
            source,
            root,
            program: Program::Bytecode(code),
        }
    }

    /// Evaluate the formula with `input` bound to the input variable.
    pub fn call(&self, input: f64) -> f64 {
        match &self.program {
            Program::Tree => evaluator::eval(self.root, input),
            Program::Bytecode(code) => VM::new(code).run(input),
        }
    }

    /// Borrow the formula as a plain closure.
    pub fn as_fn(&self) -> impl Fn(f64) -> f64 + '_ {
        move |input| self.call(input)
    }

    /// The expression tree the formula was compiled from.
    pub fn root(&self) -> &'a Node<'a> {
        self.root
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn backend(&self) -> Backend {
        match self.program {
            Program::Tree => Backend::Tree,
            Program::Bytecode(_) => Backend::Bytecode,
        }
    }

    /// The bytecode program, if the formula was compiled for the VM.
    pub fn code(&self) -> Option<&Code> {
        match &self.program {
            Program::Tree => None,
            Program::Bytecode(code) => Some(code),
        }
    }
}

impl fmt::Debug for CompiledFormula<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFormula")
            .field("source", &self.source)
            .field("root", &format_args!("{}", self.root))
            .field("backend", &self.backend())
            .finish()
    }
}
