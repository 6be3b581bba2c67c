use crate::registry::{BinaryFn, UnaryFn};
use crate::vm::{FunctionAdapter, Instruction};

/// A unary operator as seen by the VM.
#[derive(Debug, Clone)]
pub struct UnaryAdapter {
    pub symbol: String,
    pub apply: UnaryFn,
}

/// A binary operator as seen by the VM.
#[derive(Debug, Clone)]
pub struct BinaryAdapter {
    pub symbol: String,
    pub apply: BinaryFn,
}

/// A compiled program: instruction stream plus the tables it indexes into.
#[derive(Clone)]
pub struct Code {
    pub constants: Vec<f64>,
    pub unary: Vec<UnaryAdapter>,
    pub binary: Vec<BinaryAdapter>,
    /// Function call adapters, one per (function, argument count) pair.
    pub functions: Vec<FunctionAdapter>,
    pub instructions: Vec<Instruction>,
    pub max_stack_size: usize,
}

impl core::fmt::Debug for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Code {{")?;
        writeln!(f, "  max_stack_size: {}", self.max_stack_size)?;

        if !self.constants.is_empty() {
            writeln!(f, "  constants: [")?;
            for (i, constant) in self.constants.iter().enumerate() {
                writeln!(f, "    [{}] = {:?}", i, constant)?;
            }
            writeln!(f, "  ]")?;
        } else {
            writeln!(f, "  constants: []")?;
        }

        // Print instructions, resolving table indices to names
        writeln!(f, "  instructions:")?;
        let mut wide_arg: usize = 0;

        for (addr, instr) in self.instructions.iter().enumerate() {
            if let Instruction::WideArg(high) = instr {
                wide_arg = (wide_arg | (*high as usize)) << 8;
                writeln!(f, "    {:4}  {:?}", addr, instr)?;
                continue;
            }

            let note = match instr {
                Instruction::ConstLoad(low) => self
                    .constants
                    .get(wide_arg | *low as usize)
                    .map(|value| value.to_string()),
                Instruction::Unary(low) => self
                    .unary
                    .get(wide_arg | *low as usize)
                    .map(|adapter| adapter.symbol.clone()),
                Instruction::Binary(low) => self
                    .binary
                    .get(wide_arg | *low as usize)
                    .map(|adapter| adapter.symbol.clone()),
                Instruction::Call(low) => self
                    .functions
                    .get(wide_arg | *low as usize)
                    .map(|adapter| format!("{}/{}", adapter.name(), adapter.num_args())),
                _ => None,
            };

            match note {
                Some(note) => writeln!(f, "    {:4}  {:?} ; {}", addr, instr, note)?,
                None => writeln!(f, "    {:4}  {:?}", addr, instr)?,
            }
            wide_arg = 0;
        }

        write!(f, "}}")
    }
}
