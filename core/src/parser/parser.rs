use bumpalo::Bump;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::api::ParseOptions;
use crate::parser::term::{Term, TermKind, TermReader};
use crate::parser::{Node, ParseError, ParseErrorKind, Span};
use crate::registry::{Fixity, FunctionDescriptor, OperatorArity, OperatorDescriptor, Registry};

/// Threshold of the final drain of a frame; above every registered rank.
const DRAIN_ALL: u32 = u32::MAX;

/// A formula reduced to one expression tree.
#[derive(Debug, Clone, Copy)]
pub struct ParsedFormula<'arena> {
    pub source: &'arena str,
    pub root: &'arena Node<'arena>,
}

impl<'arena> ParsedFormula<'arena> {
    pub fn is_numeric(&self) -> bool {
        self.root.is_numeric()
    }
}

/// Parse `source` into a tree allocated in `arena`.
///
/// Operators and functions are resolved against `registry`; the nodes keep
/// references to its descriptors, so the registry must outlive the arena
/// contents.
pub fn parse<'arena>(
    arena: &'arena Bump,
    registry: &'arena Registry,
    options: &ParseOptions,
    source: &'arena str,
) -> Result<ParsedFormula<'arena>, ParseError> {
    debug!(formula = source, "parsing formula");

    let parser = FormulaParser {
        arena,
        registry,
        reader: TermReader::new(source, registry, options.decimal_separator),
        input_name: &options.input_name,
        max_depth: options.max_depth,
    };

    let Some(root) = parser.parse_frame(0, source.len(), 1)? else {
        return Err(parser.error(ParseErrorKind::EmptyFormula, Span::new(0, source.len())));
    };

    debug!(span = ?root.span, "parsed formula");
    Ok(ParsedFormula {
        source,
        root: root.node,
    })
}

/// A reduced value on the operand stack.
#[derive(Debug, Clone)]
struct Operand<'arena> {
    node: &'arena Node<'arena>,
    span: Span,
}

/// An operator waiting on the operator stack.
#[derive(Debug, Clone)]
struct PendingOp<'arena> {
    op: &'arena OperatorDescriptor,
    span: Span,
    /// Operand stack length when the operator was pushed. Its right-hand
    /// (or only) operand sits at this index.
    operands_before: usize,
}

/// Stacks local to one nesting level: the top level, a group interior, or
/// one function argument.
#[derive(Default)]
struct Frame<'arena> {
    operands: SmallVec<[Operand<'arena>; 4]>,
    operators: SmallVec<[PendingOp<'arena>; 4]>,
}

struct FormulaParser<'arena, 'opts> {
    arena: &'arena Bump,
    registry: &'arena Registry,
    reader: TermReader<'arena>,
    input_name: &'opts str,
    max_depth: usize,
}

impl<'arena, 'opts> FormulaParser<'arena, 'opts> {
    fn source(&self) -> &'arena str {
        self.reader.source()
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source(), span)
    }

    fn alloc(&self, node: Node<'arena>) -> &'arena Node<'arena> {
        self.arena.alloc(node)
    }

    fn leaf(&self, node: Node<'arena>, span: Span) -> Operand<'arena> {
        Operand {
            node: self.alloc(node),
            span,
        }
    }

    /// Parse `[start, end)` as an independent frame.
    ///
    /// Returns `None` when the span holds nothing but whitespace.
    fn parse_frame(
        &self,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Option<Operand<'arena>>, ParseError> {
        if depth > self.max_depth {
            return Err(self.error(
                ParseErrorKind::MaxDepthExceeded {
                    max_depth: self.max_depth,
                },
                Span::new(start, end),
            ));
        }

        let mut frame = Frame::default();
        let mut previous: Option<TermKind> = None;
        let mut pos = start;

        loop {
            pos = self.reader.skip_whitespace(pos, end);
            if pos >= end {
                break;
            }

            let term = self.reader.read_term(pos, end)?;
            trace!(kind = ?term.kind, span = %term.span, text = term.span.str_of(self.source()), "term");
            pos = term.span.end();

            match term.kind {
                TermKind::Operator => {
                    let op = self.resolve_operator(&term, previous)?;
                    // Prefix operators wait for their operand.
                    if !op.is_unary() {
                        self.reduce(&mut frame, op.precedence())?;
                    }
                    frame.operators.push(PendingOp {
                        op,
                        span: term.span,
                        operands_before: frame.operands.len(),
                    });
                }
                TermKind::Separator => {
                    return Err(self.error(ParseErrorKind::UnexpectedSeparator, term.span));
                }
                TermKind::Group => {
                    self.expect_operand_position(&term, previous)?;
                    let inner =
                        self.parse_frame(term.span.start() + 1, term.span.end() - 1, depth + 1)?;
                    let operand = match inner {
                        Some(inner) => Operand {
                            span: term.span.clone(),
                            ..inner
                        },
                        None => self.leaf(Node::Number(0.0), term.span.clone()),
                    };
                    frame.operands.push(operand);
                }
                TermKind::Constant => {
                    self.expect_operand_position(&term, previous)?;
                    let value = self.reader.parse_number(&term.span)?;
                    frame
                        .operands
                        .push(self.leaf(Node::Number(value), term.span.clone()));
                }
                TermKind::BoolConstant => {
                    self.expect_operand_position(&term, previous)?;
                    let value = term.span.str_of(self.source()).eq_ignore_ascii_case("true");
                    frame
                        .operands
                        .push(self.leaf(Node::Bool(value), term.span.clone()));
                }
                TermKind::AlphaNumeric => {
                    self.expect_operand_position(&term, previous)?;
                    let (operand, consumed) = self.parse_identifier(&term, end, depth)?;
                    frame.operands.push(operand);
                    pos = consumed;
                }
            }

            previous = Some(term.kind);
        }

        self.reduce(&mut frame, DRAIN_ALL)?;
        self.finish(frame)
    }

    /// Two operands in a row never combine.
    fn expect_operand_position(
        &self,
        term: &Term,
        previous: Option<TermKind>,
    ) -> Result<(), ParseError> {
        match previous {
            None | Some(TermKind::Operator) | Some(TermKind::Separator) => Ok(()),
            Some(_) => Err(self.error(
                ParseErrorKind::ExtraOperand {
                    text: term.span.str_of(self.source()).to_string(),
                },
                term.span.clone(),
            )),
        }
    }

    fn finish(&self, mut frame: Frame<'arena>) -> Result<Option<Operand<'arena>>, ParseError> {
        debug_assert!(frame.operators.is_empty(), "final drain empties the operator stack");
        match frame.operands.len() {
            0 => Ok(None),
            1 => Ok(frame.operands.pop()),
            _ => {
                let extra = &frame.operands[1];
                Err(self.error(
                    ParseErrorKind::ExtraOperand {
                        text: extra.span.str_of(self.source()).to_string(),
                    },
                    extra.span.clone(),
                ))
            }
        }
    }

    /// Pick the descriptor for an operator term. The unary form applies
    /// where no left operand exists yet.
    fn resolve_operator(
        &self,
        term: &Term,
        previous: Option<TermKind>,
    ) -> Result<&'arena OperatorDescriptor, ParseError> {
        let symbol = term.span.str_of(self.source());
        let wanted = match previous {
            None | Some(TermKind::Operator) | Some(TermKind::Separator) => Fixity::Unary,
            Some(_) => Fixity::Binary,
        };

        self.registry
            .lookup_operators(symbol)
            .into_iter()
            .find(|op| op.fixity() == wanted)
            .ok_or_else(|| {
                self.error(
                    ParseErrorKind::AmbiguousOperator {
                        symbol: symbol.to_string(),
                        wanted,
                    },
                    term.span.clone(),
                )
            })
    }

    /// Pop and apply pending operators while the top one's precedence is
    /// at most `threshold`.
    fn reduce(&self, frame: &mut Frame<'arena>, threshold: u32) -> Result<(), ParseError> {
        loop {
            match frame.operators.last() {
                Some(top) if top.op.precedence() <= threshold => {}
                _ => return Ok(()),
            }
            let Some(pending) = frame.operators.pop() else {
                return Ok(());
            };
            trace!(symbol = pending.op.symbol(), threshold, "drain");

            let available = frame.operands.len();
            let result = match pending.op.arity() {
                OperatorArity::Unary(apply) => match frame.operands.pop() {
                    Some(operand) if available > pending.operands_before => {
                        self.apply_unary(&pending, apply, operand)?
                    }
                    _ => return Err(self.missing_operand(&pending)),
                },
                OperatorArity::Binary(apply) => {
                    if pending.operands_before == 0 || available <= pending.operands_before {
                        return Err(self.missing_operand(&pending));
                    }
                    // Right was pushed last.
                    match (frame.operands.pop(), frame.operands.pop()) {
                        (Some(right), Some(left)) => {
                            self.apply_binary(&pending, apply, left, right)?
                        }
                        _ => return Err(self.missing_operand(&pending)),
                    }
                }
            };
            frame.operands.push(result);
        }
    }

    fn missing_operand(&self, pending: &PendingOp<'arena>) -> ParseError {
        self.error(
            ParseErrorKind::MissingOperand {
                symbol: pending.op.symbol().to_string(),
            },
            pending.span.clone(),
        )
    }

    fn expect_numeric(&self, operand: &Operand<'arena>) -> Result<(), ParseError> {
        if operand.node.is_numeric() {
            Ok(())
        } else {
            Err(self.error(
                ParseErrorKind::TypeMismatch {
                    text: operand.span.str_of(self.source()).to_string(),
                },
                operand.span.clone(),
            ))
        }
    }

    fn apply_unary(
        &self,
        pending: &PendingOp<'arena>,
        apply: fn(f64) -> f64,
        operand: Operand<'arena>,
    ) -> Result<Operand<'arena>, ParseError> {
        self.expect_numeric(&operand)?;
        let span = Span::combine(&pending.span, &operand.span);

        if pending.op.folds_constants() {
            if let Node::Number(value) = operand.node {
                return Ok(self.leaf(Node::Number(apply(*value)), span));
            }
        }

        Ok(Operand {
            node: self.alloc(Node::Unary {
                op: pending.op,
                operand: operand.node,
            }),
            span,
        })
    }

    fn apply_binary(
        &self,
        pending: &PendingOp<'arena>,
        apply: fn(f64, f64) -> f64,
        left: Operand<'arena>,
        right: Operand<'arena>,
    ) -> Result<Operand<'arena>, ParseError> {
        self.expect_numeric(&left)?;
        self.expect_numeric(&right)?;
        let span = Span::combine(&left.span, &right.span);

        if pending.op.folds_constants() {
            if let (Node::Number(a), Node::Number(b)) = (left.node, right.node) {
                return Ok(self.leaf(Node::Number(apply(*a, *b)), span));
            }
        }

        Ok(Operand {
            node: self.alloc(Node::Binary {
                op: pending.op,
                left: left.node,
                right: right.node,
            }),
            span,
        })
    }

    /// Resolve an identifier as the input variable or a function call.
    /// Returns the operand and the offset just past it.
    fn parse_identifier(
        &self,
        term: &Term,
        end: usize,
        depth: usize,
    ) -> Result<(Operand<'arena>, usize), ParseError> {
        let name = term.span.str_of(self.source());

        if name == self.input_name {
            return Ok((self.leaf(Node::Input(name), term.span.clone()), term.span.end()));
        }

        match self.registry.lookup_function(name) {
            Some(func) => self.parse_call(func, term, end, depth),
            None => Err(self.error(
                ParseErrorKind::UnknownIdentifier {
                    name: name.to_string(),
                },
                term.span.clone(),
            )),
        }
    }

    fn parse_call(
        &self,
        func: &'arena FunctionDescriptor,
        name: &Term,
        end: usize,
        depth: usize,
    ) -> Result<(Operand<'arena>, usize), ParseError> {
        let open = self.reader.skip_whitespace(name.span.end(), end);
        if open >= end || self.reader.char_at(open) != Some('(') {
            return Err(self.error(
                ParseErrorKind::MissingArguments {
                    name: func.name().to_string(),
                },
                name.span.clone(),
            ));
        }
        let close = self.reader.find_group_end(open, end)?;
        let span = Span::new(name.span.start(), close + 1);

        let mut args: SmallVec<[Operand<'arena>; 4]> = SmallVec::new();
        let interior = self.reader.skip_whitespace(open + 1, close);
        if interior < close {
            let mut arg_start = open + 1;
            loop {
                let arg_end = self.reader.find_argument_end(arg_start, close);
                let arg = match self.parse_frame(arg_start, arg_end, depth + 1)? {
                    Some(arg) => arg,
                    None => self.leaf(Node::Number(0.0), Span::new(arg_start, arg_end)),
                };
                self.expect_numeric(&arg)?;
                args.push(arg);

                if arg_end >= close {
                    break;
                }
                arg_start = arg_end + 1;
            }
        }
        trace!(function = func.name(), args = args.len(), "call");

        let arity = func.arity();
        if !arity.accepts(args.len()) {
            return Err(self.error(
                ParseErrorKind::FunctionArity {
                    name: func.name().to_string(),
                    expected: arity.expected_args().unwrap_or(args.len()),
                    found: args.len(),
                },
                span,
            ));
        }

        let nodes = self
            .arena
            .alloc_slice_fill_iter(args.iter().map(|arg| arg.node));
        let operand = Operand {
            node: self.alloc(Node::Call {
                func,
                args: &*nodes,
            }),
            span,
        };
        Ok((operand, close + 1))
    }
}
