//! Stack machine for compiled formulas.
//!
//! [`crate::compiler::BytecodeCompiler`] lowers a parsed tree into [`Code`];
//! [`VM`] runs it for one input value. The operand stack holds `f64` only.

mod code;
mod function_adapter;
mod instruction_set;
mod runtime;
mod stack;

pub use code::{BinaryAdapter, Code, UnaryAdapter};
pub use function_adapter::FunctionAdapter;
pub use instruction_set::Instruction;
pub use runtime::VM;

pub(crate) use stack::Stack;
