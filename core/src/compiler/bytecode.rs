//! Bytecode compiler implementation.

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    compiler::CompileError,
    parser::Node,
    registry::{FunctionDescriptor, OperatorArity, OperatorDescriptor},
    vm::{BinaryAdapter, Code, FunctionAdapter, Instruction, UnaryAdapter},
};

/// Largest table index a `WideArg` + operand pair can encode.
const MAX_INDEX: usize = u16::MAX as usize;

/// Bytecode compiler that lowers a parsed tree to VM instructions.
///
/// It tracks the operand stack precisely to set an exact `max_stack_size`.
pub struct BytecodeCompiler {
    /// Constant pool
    constants: Vec<f64>,

    /// Constant deduplication map, keyed by bit pattern so that `0.0` and
    /// `-0.0` stay distinct and NaN is deduplicated.
    constant_map: HashMap<u64, usize>,

    unary: Vec<UnaryAdapter>,
    binary: Vec<BinaryAdapter>,
    functions: Vec<FunctionAdapter>,

    /// Adapter deduplication maps, keyed by descriptor identity.
    unary_map: HashMap<*const OperatorDescriptor, usize>,
    binary_map: HashMap<*const OperatorDescriptor, usize>,
    function_map: HashMap<(*const FunctionDescriptor, usize), usize>,

    instructions: Vec<Instruction>,

    /// Current stack depth during compilation
    current_stack_depth: usize,

    /// Maximum stack depth observed
    max_stack_size: usize,
}

impl BytecodeCompiler {
    pub fn new() -> Self {
        Self {
            constants: Vec::new(),
            constant_map: HashMap::new(),
            unary: Vec::new(),
            binary: Vec::new(),
            functions: Vec::new(),
            unary_map: HashMap::new(),
            binary_map: HashMap::new(),
            function_map: HashMap::new(),
            instructions: Vec::new(),
            current_stack_depth: 0,
            max_stack_size: 0,
        }
    }

    /// Finalize compilation and return the bytecode.
    pub fn finalize(self) -> Code {
        Code {
            constants: self.constants,
            unary: self.unary,
            binary: self.binary,
            functions: self.functions,
            instructions: self.instructions,
            max_stack_size: self.max_stack_size,
        }
    }

    /// Convenience method to compile a tree in one call.
    pub fn compile(root: &Node<'_>) -> Result<Code, CompileError> {
        let mut compiler = Self::new();
        compiler.transform(root)?;
        if compiler.current_stack_depth != 1 {
            return Err(CompileError::UnbalancedStack {
                depth: compiler.current_stack_depth,
            });
        }
        compiler.emit(Instruction::Return);

        let code = compiler.finalize();
        debug!(
            instructions = code.instructions.len(),
            constants = code.constants.len(),
            max_stack_size = code.max_stack_size,
            "compiled bytecode"
        );
        Ok(code)
    }

    // === Stack Management ===

    /// Push a value onto the stack (increases depth by 1).
    fn push_stack(&mut self) {
        self.current_stack_depth += 1;
        if self.current_stack_depth > self.max_stack_size {
            self.max_stack_size = self.current_stack_depth;
        }
    }

    /// Pop N values from the stack.
    fn pop_stack_n(&mut self, n: usize) {
        debug_assert!(
            self.current_stack_depth >= n,
            "Stack underflow: trying to pop {} but depth is {}",
            n,
            self.current_stack_depth
        );
        self.current_stack_depth = self.current_stack_depth.saturating_sub(n);
    }

    // === Instruction Emission ===

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Emit an instruction whose operand is a table index, with a `WideArg`
    /// prefix when the index does not fit in one byte.
    fn emit_indexed(&mut self, make: fn(u8) -> Instruction, index: usize) {
        debug_assert!(index <= MAX_INDEX);
        if index > u8::MAX as usize {
            self.emit(Instruction::WideArg((index >> 8) as u8));
        }
        self.emit(make((index & 0xFF) as u8));
    }

    // === Constant Pool Management ===

    /// Add a constant to the pool (or reuse existing) and return its index.
    fn add_constant(&mut self, value: f64) -> Result<usize, CompileError> {
        if let Some(&existing_index) = self.constant_map.get(&value.to_bits()) {
            return Ok(existing_index);
        }

        let index = self.constants.len();
        if index > MAX_INDEX {
            return Err(CompileError::TooManyConstants {
                limit: MAX_INDEX + 1,
            });
        }
        self.constants.push(value);
        self.constant_map.insert(value.to_bits(), index);
        Ok(index)
    }

    // === Adapter Tables ===

    fn next_adapter_index(len: usize) -> Result<usize, CompileError> {
        if len > MAX_INDEX {
            return Err(CompileError::TooManyAdapters {
                limit: MAX_INDEX + 1,
            });
        }
        Ok(len)
    }

    fn add_unary(
        &mut self,
        op: &OperatorDescriptor,
        apply: fn(f64) -> f64,
    ) -> Result<usize, CompileError> {
        let key = op as *const OperatorDescriptor;
        if let Some(&index) = self.unary_map.get(&key) {
            return Ok(index);
        }
        let index = Self::next_adapter_index(self.unary.len())?;
        self.unary.push(UnaryAdapter {
            symbol: op.symbol().to_string(),
            apply,
        });
        self.unary_map.insert(key, index);
        Ok(index)
    }

    fn add_binary(
        &mut self,
        op: &OperatorDescriptor,
        apply: fn(f64, f64) -> f64,
    ) -> Result<usize, CompileError> {
        let key = op as *const OperatorDescriptor;
        if let Some(&index) = self.binary_map.get(&key) {
            return Ok(index);
        }
        let index = Self::next_adapter_index(self.binary.len())?;
        self.binary.push(BinaryAdapter {
            symbol: op.symbol().to_string(),
            apply,
        });
        self.binary_map.insert(key, index);
        Ok(index)
    }

    fn add_function(
        &mut self,
        func: &FunctionDescriptor,
        argc: usize,
    ) -> Result<usize, CompileError> {
        let key = (func as *const FunctionDescriptor, argc);
        if let Some(&index) = self.function_map.get(&key) {
            return Ok(index);
        }
        let index = Self::next_adapter_index(self.functions.len())?;
        self.functions
            .push(FunctionAdapter::new(func.name(), func.arity(), argc));
        self.function_map.insert(key, index);
        Ok(index)
    }

    // === Tree Traversal ===

    /// Emit code for `node`, children before parents. Iterative, so tree
    /// height is not limited by the call stack.
    fn transform(&mut self, node: &Node<'_>) -> Result<(), CompileError> {
        for node in node.post_order() {
            self.emit_node(node)?;
        }
        Ok(())
    }

    /// Emit one node, assuming its operands are already on the stack.
    fn emit_node(&mut self, node: &Node<'_>) -> Result<(), CompileError> {
        match node {
            Node::Number(value) => {
                let index = self.add_constant(*value)?;
                self.emit_indexed(Instruction::ConstLoad, index);
                self.push_stack();
            }

            Node::Input(_) => {
                self.emit(Instruction::LoadInput);
                self.push_stack();
            }

            Node::Unary { op, .. } => {
                // Pops 1, pushes 1
                let OperatorArity::Unary(apply) = op.arity() else {
                    return Err(CompileError::UnbalancedStack {
                        depth: self.current_stack_depth,
                    });
                };
                let index = self.add_unary(op, apply)?;
                self.pop_stack_n(1);
                self.emit_indexed(Instruction::Unary, index);
                self.push_stack();
            }

            Node::Binary { op, .. } => {
                // Pops 2, pushes 1
                let OperatorArity::Binary(apply) = op.arity() else {
                    return Err(CompileError::UnbalancedStack {
                        depth: self.current_stack_depth,
                    });
                };
                let index = self.add_binary(op, apply)?;
                self.pop_stack_n(2);
                self.emit_indexed(Instruction::Binary, index);
                self.push_stack();
            }

            Node::Call { func, args } => {
                // Arguments were pushed in order
                let index = self.add_function(func, args.len())?;
                self.pop_stack_n(args.len());
                self.emit_indexed(Instruction::Call, index);
                self.push_stack();
            }

            Node::Bool(value) => {
                return Err(CompileError::BooleanValue {
                    text: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for BytecodeCompiler {
    fn default() -> Self {
        Self::new()
    }
}
