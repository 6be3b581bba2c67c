//! Built-in arithmetic operators.

use super::precedence::{ADDITIVE, MULTIPLICATIVE, NEGATE};
use crate::registry::OperatorDescriptor;

fn add(left: f64, right: f64) -> f64 {
    left + right
}

fn subtract(left: f64, right: f64) -> f64 {
    left - right
}

fn multiply(left: f64, right: f64) -> f64 {
    left * right
}

/// IEEE 754 semantics: division by zero yields an infinity or NaN.
fn divide(left: f64, right: f64) -> f64 {
    left / right
}

fn negate(operand: f64) -> f64 {
    -operand
}

pub fn builtin_operators() -> [OperatorDescriptor; 5] {
    [
        OperatorDescriptor::binary("+", ADDITIVE, add),
        OperatorDescriptor::binary("-", ADDITIVE, subtract),
        OperatorDescriptor::binary("*", MULTIPLICATIVE, multiply),
        OperatorDescriptor::binary("/", MULTIPLICATIVE, divide),
        // Negating a literal must yield a literal.
        OperatorDescriptor::unary("-", NEGATE, negate).folding(),
    ]
}
