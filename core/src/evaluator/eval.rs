//! Core evaluation logic.

use smallvec::SmallVec;

use crate::parser::Node;
use crate::registry::OperatorArity;

/// Evaluator for one binding of the input variable.
pub struct Evaluator {
    input: f64,
}

impl Evaluator {
    pub fn new(input: f64) -> Self {
        Self { input }
    }

    /// REQUIRES: `node` is numeric and was built by the parser.
    ///
    /// Operands are evaluated left first. The walk is iterative, so deep
    /// trees do not grow the call stack.
    pub fn eval(&self, node: &Node<'_>) -> f64 {
        let mut values: SmallVec<[f64; 16]> = SmallVec::new();
        for node in node.post_order() {
            let value = match node {
                Node::Number(value) => *value,
                Node::Input(_) => self.input,
                Node::Unary { op, .. } => {
                    let operand = values.pop().unwrap_or(f64::NAN);
                    match op.arity() {
                        OperatorArity::Unary(apply) => apply(operand),
                        OperatorArity::Binary(_) => {
                            debug_assert!(false, "unary node with binary operator '{}'", op.symbol());
                            f64::NAN
                        }
                    }
                }
                Node::Binary { op, .. } => {
                    let right = values.pop().unwrap_or(f64::NAN);
                    let left = values.pop().unwrap_or(f64::NAN);
                    match op.arity() {
                        OperatorArity::Binary(apply) => apply(left, right),
                        OperatorArity::Unary(_) => {
                            debug_assert!(false, "binary node with unary operator '{}'", op.symbol());
                            f64::NAN
                        }
                    }
                }
                Node::Call { func, args } => {
                    let start = values.len().saturating_sub(args.len());
                    let result = func.arity().apply(&values[start..]);
                    values.truncate(start);
                    result
                }
                // Rejected before evaluation; see `Engine::compile`.
                Node::Bool(_) => {
                    debug_assert!(false, "boolean node reached the evaluator");
                    f64::NAN
                }
            };
            values.push(value);
        }
        values.pop().unwrap_or(f64::NAN)
    }
}
