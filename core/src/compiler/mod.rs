//! Bytecode compiler for parsed formulas.
//!
//! Lowers a [`Node`](crate::parser::Node) tree into [`Code`](crate::vm::Code)
//! for the stack machine in [`crate::vm`].
//!
//! ## Design
//!
//! - Post-order traversal: operands first, left before right
//! - Constants and operator/function adapters are deduplicated
//! - Stack depth is tracked exactly and recorded as `max_stack_size`

mod bytecode;
mod error;


pub use bytecode::BytecodeCompiler;
pub use error::CompileError;
