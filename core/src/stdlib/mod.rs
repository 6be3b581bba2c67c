//! Built-in catalog.
//!
//! - Operators: `+`, `-` (binary and unary), `*`, `/`
//! - Math: `Abs`, `Min`, `Max`, plus the opt-in extras of
//!   [`register_math_extras`]
//!
//! Each entry is a plain `fn` pointer wrapped in a descriptor, so hosts can
//! extend the catalog the same way through [`Registry`].

use crate::registry::{Registry, RegistryError};

pub mod math;
pub mod operators;

pub use math::register_math_extras;

/// Precedence ranks of the built-in operators (lower drains first).
pub mod precedence {
    pub const NEGATE: u32 = 2;
    pub const MULTIPLICATIVE: u32 = 3;
    pub const ADDITIVE: u32 = 4;
}

/// Fill `registry` with the built-in operators and functions.
pub(crate) fn install_builtins(registry: &mut Registry) {
    for op in operators::builtin_operators() {
        registry.insert_operator(op);
    }
    for func in math::builtin_functions() {
        registry.insert_function(func);
    }
}

/// Register the built-in catalog into a registry that may already hold
/// host-defined entries.
pub fn register_stdlib(registry: &mut Registry) -> Result<(), RegistryError> {
    for op in operators::builtin_operators() {
        registry.register_operator(op)?;
    }
    for func in math::builtin_functions() {
        registry.register_function(func)?;
    }
    Ok(())
}
