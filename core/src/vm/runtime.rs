use tracing::trace;

use super::instruction_set::Instruction;

use crate::vm::{Code, Stack};

pub struct VM<'c> {
    code: &'c Code,
    ip: usize,
    stack: Stack<f64>,
}

impl<'c> VM<'c> {
    pub fn new(code: &'c Code) -> Self {
        VM {
            code,
            ip: 0,
            stack: Stack::new(code.max_stack_size),
        }
    }

    /// Run the program from the start with the input variable bound to
    /// `input`.
    ///
    /// Code produced by the compiler never underflows the stack or indexes
    /// past its tables; malformed code trips a debug assertion and yields
    /// NaN in release builds.
    pub fn run(&mut self, input: f64) -> f64 {
        self.ip = 0;
        self.stack.pop_n(self.stack.len());

        let mut wide_arg: usize = 0;
        loop {
            let Some(&instruction) = self.code.instructions.get(self.ip) else {
                return self.malformed("ran past the last instruction");
            };
            self.ip += 1;

            use Instruction::*;
            match instruction {
                ConstLoad(low) => match self.code.constants.get(wide_arg | low as usize) {
                    Some(&value) => self.stack.push(value),
                    None => return self.malformed("constant index out of range"),
                },
                WideArg(arg) => {
                    wide_arg |= arg as usize;
                    wide_arg <<= 8;
                    continue;
                }
                LoadInput => self.stack.push(input),
                Unary(low) => {
                    let Some(adapter) = self.code.unary.get(wide_arg | low as usize) else {
                        return self.malformed("unary adapter index out of range");
                    };
                    let Some(a) = self.stack.pop() else {
                        return self.malformed("stack underflow");
                    };
                    self.stack.push((adapter.apply)(a));
                }
                Binary(low) => {
                    let Some(adapter) = self.code.binary.get(wide_arg | low as usize) else {
                        return self.malformed("binary adapter index out of range");
                    };
                    let (Some(b), Some(a)) = (self.stack.pop(), self.stack.pop()) else {
                        return self.malformed("stack underflow");
                    };
                    self.stack.push((adapter.apply)(a, b));
                }
                Call(low) => {
                    let Some(adapter) = self.code.functions.get(wide_arg | low as usize) else {
                        return self.malformed("function adapter index out of range");
                    };
                    let result = adapter.call(&mut self.stack);
                    self.stack.push(result);
                }
                Return => {
                    return match self.stack.pop() {
                        Some(result) => result,
                        None => self.malformed("nothing to return"),
                    };
                }
            }
            wide_arg = 0;
        }
    }

    fn malformed(&self, reason: &str) -> f64 {
        trace!(ip = self.ip, reason, "malformed bytecode");
        debug_assert!(false, "malformed bytecode at {}: {}", self.ip, reason);
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{BinaryAdapter, UnaryAdapter};

    fn code(constants: Vec<f64>, instructions: Vec<Instruction>, max_stack_size: usize) -> Code {
        Code {
            constants,
            unary: vec![UnaryAdapter {
                symbol: "-".to_string(),
                apply: |x| -x,
            }],
            binary: vec![
                BinaryAdapter {
                    symbol: "*".to_string(),
                    apply: |a, b| a * b,
                },
                BinaryAdapter {
                    symbol: "-".to_string(),
                    apply: |a, b| a - b,
                },
            ],
            functions: Vec::new(),
            instructions,
            max_stack_size,
        }
    }

    #[test]
    fn test_works() {
        use Instruction::*;
        let code = code(vec![42.0], vec![ConstLoad(0), LoadInput, Binary(0), Return], 2);
        let mut vm = VM::new(&code);
        assert_eq!(vm.run(2.0), 84.0);
        // Reusable across inputs.
        assert_eq!(vm.run(0.5), 21.0);
    }

    #[test]
    fn test_left_operand_is_pushed_first() {
        use Instruction::*;
        let code = code(vec![10.0, 4.0], vec![ConstLoad(0), ConstLoad(1), Binary(1), Unary(0), Return], 2);
        assert_eq!(VM::new(&code).run(0.0), -6.0);
    }

    #[test]
    fn test_wide() {
        use Instruction::*;
        let mut constants = vec![0.0; 300];
        constants[299] = 2.5;
        let code = code(
            constants,
            vec![WideArg(1), ConstLoad(43), LoadInput, Binary(0), Return],
            2,
        );
        assert_eq!(VM::new(&code).run(4.0), 10.0);
    }
}
