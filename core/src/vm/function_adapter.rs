use crate::registry::FunctionArity;
use crate::vm::Stack;

/// Bridges a registry function to the VM: it knows how many arguments the
/// call site pushed and hands them to the function as one slice.
#[derive(Debug, Clone)]
pub struct FunctionAdapter {
    name: String,
    function: FunctionArity,
    argc: usize,
}

impl FunctionAdapter {
    pub fn new(name: impl Into<String>, function: FunctionArity, argc: usize) -> Self {
        debug_assert!(function.accepts(argc), "argument count checked at parse time");
        FunctionAdapter {
            name: name.into(),
            function,
            argc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_args(&self) -> usize {
        self.argc
    }

    /// Consume the arguments on top of `stack` and return the result.
    pub fn call(&self, stack: &mut Stack<f64>) -> f64 {
        let result = match stack.top_n(self.argc) {
            Some(args) => self.function.apply(args),
            None => {
                debug_assert!(false, "stack underflow calling {}", self.name);
                f64::NAN
            }
        };
        stack.pop_n(self.argc);
        result
    }
}
