//! Core of the statexpr formula language.
//!
//! A formula is a single arithmetic expression over one numeric input (`In`),
//! numeric and boolean constants, parenthesised groups, unary and binary
//! operators, and calls to registered functions. [`api::Engine`] parses a
//! formula with the operator-precedence engine in [`parser`] and turns the
//! result into a [`api::CompiledFormula`] that maps one `f64` to another.

pub mod api;
pub mod compiler;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod vm;
