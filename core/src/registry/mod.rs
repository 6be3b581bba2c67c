//! Operator and function catalog.
//!
//! The registry is built once, before any parse, and is read-only afterwards.
//! [`Registry::global`] holds the built-in catalog for the whole process;
//! hosts that need more operators or functions build their own with
//! [`Registry::builtin`] followed by [`Registry::register_operator`] /
//! [`Registry::register_function`].

mod descriptor;
mod error;

pub use descriptor::{
    BinaryFn, Fixity, FunctionArity, FunctionDescriptor, OperatorArity, OperatorDescriptor,
    TernaryFn, UnaryFn, VariadicFn,
};
pub use error::RegistryError;

use hashbrown::{HashMap, HashSet};
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use tracing::debug;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::builtin);

/// The (at most two) descriptors sharing one symbol.
#[derive(Debug, Default, Clone)]
struct OperatorForms {
    unary: Option<OperatorDescriptor>,
    binary: Option<OperatorDescriptor>,
}

impl OperatorForms {
    fn slot(&mut self, fixity: Fixity) -> &mut Option<OperatorDescriptor> {
        match fixity {
            Fixity::Unary => &mut self.unary,
            Fixity::Binary => &mut self.binary,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Registry {
    operators: HashMap<String, OperatorForms>,
    functions: HashMap<String, FunctionDescriptor>,
    alphabet: HashSet<char>,
}

impl Registry {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in operators (`+ - * /`, unary `-`) and functions
    /// (`Abs`, `Min`, `Max`).
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::stdlib::install_builtins(&mut registry);
        registry
    }

    /// Process-wide built-in catalog.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Add an operator. A symbol can carry one unary and one binary form.
    pub fn register_operator(&mut self, op: OperatorDescriptor) -> Result<(), RegistryError> {
        if op.symbol().is_empty() || !op.symbol().chars().all(is_valid_symbol_char) {
            return Err(RegistryError::InvalidSymbol {
                symbol: op.symbol().to_string(),
            });
        }
        if op.precedence() == u32::MAX {
            return Err(RegistryError::ReservedPrecedence {
                symbol: op.symbol().to_string(),
                precedence: op.precedence(),
            });
        }
        let taken = self
            .operators
            .get(op.symbol())
            .is_some_and(|forms| match op.fixity() {
                Fixity::Unary => forms.unary.is_some(),
                Fixity::Binary => forms.binary.is_some(),
            });
        if taken {
            return Err(RegistryError::DuplicateOperator {
                symbol: op.symbol().to_string(),
                fixity: op.fixity(),
            });
        }
        self.insert_operator(op);
        Ok(())
    }

    /// Add a function. Names are case-sensitive.
    pub fn register_function(&mut self, func: FunctionDescriptor) -> Result<(), RegistryError> {
        if !is_valid_identifier(func.name()) {
            return Err(RegistryError::InvalidName {
                name: func.name().to_string(),
            });
        }
        if self.functions.contains_key(func.name()) {
            return Err(RegistryError::DuplicateFunction {
                name: func.name().to_string(),
            });
        }
        self.insert_function(func);
        Ok(())
    }

    /// Insert without validation; used for the static built-in catalog.
    pub(crate) fn insert_operator(&mut self, op: OperatorDescriptor) {
        debug!(
            symbol = op.symbol(),
            precedence = op.precedence(),
            fixity = %op.fixity(),
            "register operator"
        );
        self.alphabet.extend(op.symbol().chars());
        let fixity = op.fixity();
        let key = op.symbol().to_string();
        *self.operators.entry(key).or_default().slot(fixity) = Some(op);
    }

    pub(crate) fn insert_function(&mut self, func: FunctionDescriptor) {
        debug!(name = func.name(), "register function");
        self.functions.insert(func.name().to_string(), func);
    }

    /// All descriptors registered under `symbol`: zero, one, or two
    /// (unary first).
    pub fn lookup_operators(&self, symbol: &str) -> SmallVec<[&OperatorDescriptor; 2]> {
        let mut found = SmallVec::new();
        if let Some(forms) = self.operators.get(symbol) {
            found.extend(forms.unary.as_ref());
            found.extend(forms.binary.as_ref());
        }
        found
    }

    pub fn has_operator(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(name)
    }

    /// Every character that appears in some operator symbol.
    pub fn operator_alphabet(&self) -> &HashSet<char> {
        &self.alphabet
    }

    pub fn is_operator_char(&self, c: char) -> bool {
        self.alphabet.contains(&c)
    }

    /// Registered function names, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Characters the tokenizer claims for other term kinds cannot be part of
/// an operator symbol.
pub(crate) fn is_valid_symbol_char(c: char) -> bool {
    !(c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(c, '_' | '(' | ')' | ';' | '.' | ','))
}

/// Names usable for functions and the input variable.
pub(crate) fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && name.chars().any(|c| c.is_alphabetic() || c == '_')
        && !name.eq_ignore_ascii_case("true")
        && !name.eq_ignore_ascii_case("false")
}
