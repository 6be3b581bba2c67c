//! Static descriptions of operators and functions.

use core::fmt;

pub type UnaryFn = fn(f64) -> f64;
pub type BinaryFn = fn(f64, f64) -> f64;
pub type TernaryFn = fn(f64, f64, f64) -> f64;
pub type VariadicFn = fn(&[f64]) -> f64;

/// Whether an operator takes one operand (prefix) or two (infix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Unary,
    Binary,
}

impl fmt::Display for Fixity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fixity::Unary => write!(f, "unary"),
            Fixity::Binary => write!(f, "binary"),
        }
    }
}

/// Operator shape together with its numeric rule.
#[derive(Debug, Clone, Copy)]
pub enum OperatorArity {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

impl OperatorArity {
    pub fn fixity(&self) -> Fixity {
        match self {
            OperatorArity::Unary(_) => Fixity::Unary,
            OperatorArity::Binary(_) => Fixity::Binary,
        }
    }
}

/// One operator of the catalog.
///
/// Precedence follows a min-first convention: the *lower* the value, the
/// earlier the operator is drained, so it binds tighter.
#[derive(Debug, Clone)]
pub struct OperatorDescriptor {
    symbol: String,
    precedence: u32,
    arity: OperatorArity,
    folds_constants: bool,
}

impl OperatorDescriptor {
    pub fn unary(symbol: impl Into<String>, precedence: u32, apply: UnaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            arity: OperatorArity::Unary(apply),
            folds_constants: false,
        }
    }

    pub fn binary(symbol: impl Into<String>, precedence: u32, apply: BinaryFn) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            arity: OperatorArity::Binary(apply),
            folds_constants: false,
        }
    }

    /// Apply the operator at parse time when every operand is a numeric
    /// literal, producing a literal instead of an application node.
    pub fn folding(mut self) -> Self {
        self.folds_constants = true;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    pub fn arity(&self) -> OperatorArity {
        self.arity
    }

    pub fn fixity(&self) -> Fixity {
        self.arity.fixity()
    }

    pub fn is_unary(&self) -> bool {
        self.fixity() == Fixity::Unary
    }

    pub fn folds_constants(&self) -> bool {
        self.folds_constants
    }
}

/// Function shape together with its numeric rule.
#[derive(Debug, Clone, Copy)]
pub enum FunctionArity {
    Unary(UnaryFn),
    Binary(BinaryFn),
    Ternary(TernaryFn),
    /// Accepts any number of arguments, including none.
    Variadic(VariadicFn),
}

impl FunctionArity {
    /// Exact argument count, or `None` for variadic functions.
    pub fn expected_args(&self) -> Option<usize> {
        match self {
            FunctionArity::Unary(_) => Some(1),
            FunctionArity::Binary(_) => Some(2),
            FunctionArity::Ternary(_) => Some(3),
            FunctionArity::Variadic(_) => None,
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        self.expected_args().is_none_or(|expected| expected == count)
    }

    /// Evaluate with already computed argument values.
    ///
    /// REQUIRES: `self.accepts(args.len())`.
    pub fn apply(&self, args: &[f64]) -> f64 {
        debug_assert!(self.accepts(args.len()), "argument count checked at parse time");
        match (self, args) {
            (FunctionArity::Unary(f), [a]) => f(*a),
            (FunctionArity::Binary(f), [a, b]) => f(*a, *b),
            (FunctionArity::Ternary(f), [a, b, c]) => f(*a, *b, *c),
            (FunctionArity::Variadic(f), args) => f(args),
            _ => f64::NAN,
        }
    }
}

/// One function of the catalog.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    name: String,
    arity: FunctionArity,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, arity: FunctionArity) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    pub fn unary(name: impl Into<String>, apply: UnaryFn) -> Self {
        Self::new(name, FunctionArity::Unary(apply))
    }

    pub fn binary(name: impl Into<String>, apply: BinaryFn) -> Self {
        Self::new(name, FunctionArity::Binary(apply))
    }

    pub fn ternary(name: impl Into<String>, apply: TernaryFn) -> Self {
        Self::new(name, FunctionArity::Ternary(apply))
    }

    pub fn variadic(name: impl Into<String>, apply: VariadicFn) -> Self {
        Self::new(name, FunctionArity::Variadic(apply))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> FunctionArity {
        self.arity
    }
}
