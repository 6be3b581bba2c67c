//! Term reader.
//!
//! Classifies the next lexical unit of a formula without building a token
//! list. Every position handled here is a byte offset on a char boundary,
//! and every scan is bounded by an explicit `end` so the parser can reread
//! the interior of a group or of one function argument in place.

use crate::parser::{ParseError, ParseErrorKind, Span};
use crate::registry::Registry;

/// Separates function arguments.
pub const ARGUMENT_SEPARATOR: char = ';';

/// Decimal separator accepted regardless of configuration.
pub const INVARIANT_DECIMAL_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Operator,
    /// Identifier: the input variable or a function name.
    AlphaNumeric,
    /// Numeric literal.
    Constant,
    BoolConstant,
    /// Parenthesised group; the span covers both parentheses.
    Group,
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
}

pub struct TermReader<'s> {
    source: &'s str,
    registry: &'s Registry,
    decimal_separator: char,
}

impl<'s> TermReader<'s> {
    pub fn new(source: &'s str, registry: &'s Registry, decimal_separator: char) -> Self {
        Self {
            source,
            registry,
            decimal_separator,
        }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..)?.chars().next()
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.source, span)
    }

    /// Offset of the first char in `[start, end)` matching `pred`, or `end`.
    fn scan(&self, start: usize, end: usize, mut pred: impl FnMut(char) -> bool) -> usize {
        self.source[start..end]
            .char_indices()
            .find(|&(_, c)| pred(c))
            .map_or(end, |(i, _)| start + i)
    }

    pub fn skip_whitespace(&self, pos: usize, end: usize) -> usize {
        self.scan(pos, end, |c| !c.is_whitespace())
    }

    /// Classify the term starting at `pos`.
    ///
    /// REQUIRES: `pos < end` and `pos` is not whitespace.
    pub fn read_term(&self, pos: usize, end: usize) -> Result<Term, ParseError> {
        let Some(c) = self.char_at(pos) else {
            return Err(self.error(ParseErrorKind::EmptyFormula, Span::new(pos, end)));
        };

        if self.registry.is_operator_char(c) {
            return self.read_operator(pos, end);
        }
        if c == '(' {
            let close = self.find_group_end(pos, end)?;
            return Ok(Term {
                kind: TermKind::Group,
                span: Span::new(pos, close + 1),
            });
        }
        if c == ')' {
            return Err(self.error(ParseErrorKind::UnbalancedGroup, Span::new(pos, pos + 1)));
        }
        if self.is_alphanumeric_char(c) {
            return Ok(self.read_alphanumeric(pos, end));
        }
        if c == ARGUMENT_SEPARATOR {
            return Ok(Term {
                kind: TermKind::Separator,
                span: Span::new(pos, pos + c.len_utf8()),
            });
        }

        Err(self.error(
            ParseErrorKind::Lexical { found: c },
            Span::new(pos, pos + c.len_utf8()),
        ))
    }

    /// Longest registered symbol that prefixes the run of operator chars.
    fn read_operator(&self, pos: usize, end: usize) -> Result<Term, ParseError> {
        let run_end = self.scan(pos, end, |c| !self.registry.is_operator_char(c));

        let mut candidate = run_end;
        while candidate > pos {
            if self.registry.has_operator(&self.source[pos..candidate]) {
                return Ok(Term {
                    kind: TermKind::Operator,
                    span: Span::new(pos, candidate),
                });
            }
            // Drop the last char of the candidate.
            candidate = self.source[pos..candidate]
                .char_indices()
                .next_back()
                .map_or(pos, |(i, _)| pos + i);
        }

        Err(self.error(
            ParseErrorKind::UnknownOperator {
                symbol: self.source[pos..run_end].to_string(),
            },
            Span::new(pos, run_end),
        ))
    }

    fn is_alphanumeric_char(&self, c: char) -> bool {
        c.is_alphanumeric()
            || c == '_'
            || c == INVARIANT_DECIMAL_SEPARATOR
            || c == self.decimal_separator
    }

    fn read_alphanumeric(&self, pos: usize, end: usize) -> Term {
        let run_end = self.scan(pos, end, |c| !self.is_alphanumeric_char(c));
        let text = &self.source[pos..run_end];

        let kind = if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
            TermKind::BoolConstant
        } else if text.chars().any(|c| c.is_alphabetic() || c == '_') {
            TermKind::AlphaNumeric
        } else {
            TermKind::Constant
        };

        Term {
            kind,
            span: Span::new(pos, run_end),
        }
    }

    /// Offset of the `)` matching the `(` at `open`.
    pub fn find_group_end(&self, open: usize, end: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        for (i, c) in self.source[open..end].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(open + i);
                    }
                }
                _ => {}
            }
        }
        Err(self.error(ParseErrorKind::UnbalancedGroup, Span::new(open, end)))
    }

    /// End of the argument starting at `start`: the next separator at depth
    /// zero, or `end` (the closing parenthesis of the argument list).
    pub fn find_argument_end(&self, start: usize, end: usize) -> usize {
        let mut depth = 0usize;
        for (i, c) in self.source[start..end].char_indices() {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ARGUMENT_SEPARATOR if depth == 0 => return start + i,
                _ => {}
            }
        }
        end
    }

    /// Value of a `Constant` term. The configured separator is read as the
    /// invariant one.
    pub fn parse_number(&self, span: &Span) -> Result<f64, ParseError> {
        let text = span.str_of(self.source);
        let parsed = if self.decimal_separator != INVARIANT_DECIMAL_SEPARATOR
            && text.contains(self.decimal_separator)
        {
            let mut buf = [0u8; 4];
            let separator: &str = INVARIANT_DECIMAL_SEPARATOR.encode_utf8(&mut buf);
            text.replace(self.decimal_separator, separator).parse::<f64>()
        } else {
            text.parse::<f64>()
        };

        parsed.map_err(|_| {
            self.error(
                ParseErrorKind::MalformedNumber {
                    text: text.to_string(),
                },
                span.clone(),
            )
        })
    }
}
