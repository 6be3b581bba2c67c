//! Tree-walking evaluator for parsed formulas.
//!
//! The parser guarantees that every operand and argument is numeric and
//! that argument counts match their functions, so evaluation cannot fail:
//! it is plain `f64` arithmetic and follows IEEE 754 for division by zero,
//! overflow and NaN. The tree is walked with an explicit stack, so there
//! is no limit on its height.
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use statexpr_core::{api::ParseOptions, evaluator, parser, registry::Registry};
//!
//! let arena = Bump::new();
//! let parsed = parser::parse(&arena, Registry::global(), &ParseOptions::default(), "In * 2").unwrap();
//! assert_eq!(evaluator::eval(parsed.root, 4.0), 8.0);
//! ```

mod eval;


pub use eval::Evaluator;

use crate::parser::Node;

/// Evaluate `root` with the input variable bound to `input`.
pub fn eval(root: &Node<'_>, input: f64) -> f64 {
    Evaluator::new(input).eval(root)
}
