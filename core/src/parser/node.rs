use core::fmt;

use smallvec::SmallVec;

use crate::registry::{FunctionDescriptor, OperatorDescriptor};

/// Expression tree produced by the parser.
///
/// Nodes live in the arena passed to [`parse`](super::parse) and point at the
/// descriptors of the registry that resolved them. Every node is either
/// numeric or boolean; only [`Node::Bool`] is boolean, and the parser never
/// lets it become an operand.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Number(f64),
    Bool(bool),
    /// The bound input variable, with the name it was written as.
    Input(&'a str),
    Unary {
        op: &'a OperatorDescriptor,
        operand: &'a Node<'a>,
    },
    Binary {
        op: &'a OperatorDescriptor,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    },
    Call {
        func: &'a FunctionDescriptor,
        args: &'a [&'a Node<'a>],
    },
}

impl<'a> Node<'a> {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Node::Bool(_))
    }

    /// Whether the node reads the input variable anywhere below it.
    pub fn depends_on_input(&self) -> bool {
        self.post_order().any(|node| matches!(node, Node::Input(_)))
    }

    /// Visit every node below and including this one, children before
    /// their parent and left before right.
    ///
    /// The walk keeps its own stack, so tree height is not limited by the
    /// thread's call stack.
    pub fn post_order(&self) -> PostOrder<'_> {
        let mut pending = SmallVec::new();
        pending.push((self, false));
        PostOrder { pending }
    }

    /// Equality of this node alone: same variant, same value or
    /// descriptor, same number of children.
    fn shallow_eq(&self, other: &Node<'_>) -> bool {
        match (self, other) {
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Input(a), Node::Input(b)) => a == b,
            (Node::Unary { op, .. }, Node::Unary { op: other, .. })
            | (Node::Binary { op, .. }, Node::Binary { op: other, .. }) => {
                core::ptr::eq(*op, *other)
            }
            (Node::Call { func, args }, Node::Call { func: other, args: other_args }) => {
                core::ptr::eq(*func, *other) && args.len() == other_args.len()
            }
            _ => false,
        }
    }
}

/// Iterator returned by [`Node::post_order`].
pub struct PostOrder<'n> {
    /// Nodes still to visit; `true` once their children are queued.
    pending: SmallVec<[(&'n Node<'n>, bool); 16]>,
}

impl<'n> Iterator for PostOrder<'n> {
    type Item = &'n Node<'n>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.pending.pop() {
            if expanded {
                return Some(node);
            }
            self.pending.push((node, true));
            match node {
                Node::Unary { operand, .. } => self.pending.push((*operand, false)),
                Node::Binary { left, right, .. } => {
                    self.pending.push((*right, false));
                    self.pending.push((*left, false));
                }
                Node::Call { args, .. } => {
                    for arg in args.iter().rev() {
                        self.pending.push((*arg, false));
                    }
                }
                Node::Number(_) | Node::Bool(_) | Node::Input(_) => {}
            }
        }
        None
    }
}

/// Structural equality; descriptors compare by identity.
///
/// Two trees are equal when their post-order walks match node for node,
/// since each node's child count fixes the shape.
impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.post_order();
        let mut right = other.post_order();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.shallow_eq(b) => {}
                _ => return false,
            }
        }
    }
}

/// A piece of output still to be written by `Display`.
enum Piece<'n> {
    Node(&'n Node<'n>),
    Text(&'n str),
}

/// Fully parenthesised rendering, e.g. `((2 + 3) * In)` or `Max(1; -2)`.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pieces: SmallVec<[Piece<'_>; 16]> = SmallVec::new();
        pieces.push(Piece::Node(self));

        // Pieces are pushed in reverse of the order they are written.
        while let Some(piece) = pieces.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node {
                Node::Number(value) => write!(f, "{value}")?,
                Node::Bool(value) => write!(f, "{value}")?,
                Node::Input(name) => f.write_str(name)?,
                Node::Unary { op, operand } => {
                    write!(f, "({}", op.symbol())?;
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Node(*operand));
                }
                Node::Binary { op, left, right } => {
                    f.write_str("(")?;
                    pieces.push(Piece::Text(")"));
                    pieces.push(Piece::Node(*right));
                    pieces.push(Piece::Text(" "));
                    pieces.push(Piece::Text(op.symbol()));
                    pieces.push(Piece::Text(" "));
                    pieces.push(Piece::Node(*left));
                }
                Node::Call { func, args } => {
                    write!(f, "{}(", func.name())?;
                    pieces.push(Piece::Text(")"));
                    for (i, arg) in args.iter().enumerate().rev() {
                        pieces.push(Piece::Node(*arg));
                        if i > 0 {
                            pieces.push(Piece::Text("; "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
