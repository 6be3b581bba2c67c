//! Math Package
//!
//! Functions backed by the `f64` primitives of the standard library.
//!
//! Built-in: Abs, Min, Max
//! Extras (opt-in): Clamp, Pow, Floor, Ceil, Round, Sqrt

use crate::registry::{FunctionDescriptor, Registry, RegistryError};

// ============================================================================
// Basic Operations
// ============================================================================

/// Absolute value
fn math_abs(value: f64) -> f64 {
    value.abs()
}

/// Minimum of two values
fn math_min(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Maximum of two values
fn math_max(a: f64, b: f64) -> f64 {
    a.max(b)
}

/// Clamp a value between min and max
///
/// An inverted range yields NaN instead of panicking.
fn math_clamp(value: f64, min: f64, max: f64) -> f64 {
    if min > max || min.is_nan() || max.is_nan() {
        return f64::NAN;
    }
    value.clamp(min, max)
}

// ============================================================================
// Rounding Functions
// ============================================================================

/// Floor function - returns largest integer <= x
fn math_floor(value: f64) -> f64 {
    value.floor()
}

/// Ceiling function - returns smallest integer >= x
fn math_ceil(value: f64) -> f64 {
    value.ceil()
}

/// Round to nearest integer, half away from zero
fn math_round(value: f64) -> f64 {
    value.round()
}

// ============================================================================
// Exponentiation
// ============================================================================

/// Square root
fn math_sqrt(value: f64) -> f64 {
    // Note: sqrt of negative returns NaN (IEEE 754 semantics)
    value.sqrt()
}

/// Power function - base^exp
fn math_pow(base: f64, exp: f64) -> f64 {
    base.powf(exp)
}

// ============================================================================
// Package Builders
// ============================================================================

pub fn builtin_functions() -> [FunctionDescriptor; 3] {
    [
        FunctionDescriptor::unary("Abs", math_abs),
        FunctionDescriptor::binary("Min", math_min),
        FunctionDescriptor::binary("Max", math_max),
    ]
}

/// Register the optional math functions.
///
/// # Example
///
/// ```
/// use statexpr_core::registry::Registry;
/// use statexpr_core::stdlib::register_math_extras;
///
/// let mut registry = Registry::builtin();
/// register_math_extras(&mut registry).unwrap();
/// assert!(registry.lookup_function("Clamp").is_some());
/// ```
pub fn register_math_extras(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_function(FunctionDescriptor::ternary("Clamp", math_clamp))?;
    registry.register_function(FunctionDescriptor::binary("Pow", math_pow))?;
    registry.register_function(FunctionDescriptor::unary("Floor", math_floor))?;
    registry.register_function(FunctionDescriptor::unary("Ceil", math_ceil))?;
    registry.register_function(FunctionDescriptor::unary("Round", math_round))?;
    registry.register_function(FunctionDescriptor::unary("Sqrt", math_sqrt))?;
    Ok(())
}
