// Copyright 2015 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::ast::{ClassKind, Expr};
use crate::error::{ParseError, ParseErrorKind};
use std::str::CharIndices;

/// Parses a pattern into an `Expr`.
///
/// See the crate documentation for the syntax. Parsing is all-or-nothing: on error, nothing but
/// the error is returned.
pub fn parse(re: &str) -> Result<Expr, ParseError> {
    Parser::new(re).parse()
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BinOp {
    Concat,
    Union,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Op {
    // A binary operator, and the offset of the character that produced it.
    Bin(BinOp, usize),
    // An open parenthesis. Operators inside the group may only use the operands above `floor`.
    Group { offset: usize, floor: usize },
}

/// An operator-precedence parser with two stacks: one of finished operands and one of pending
/// operators. Concatenation is never written explicitly, so we insert it whenever an operand
/// directly follows another one.
struct Parser<'a> {
    re: &'a str,
    chars: CharIndices<'a>,
    operands: Vec<Expr>,
    operators: Vec<Op>,
    // True if the last thing we parsed was a complete operand, meaning that another operand
    // would need to be concatenated with it.
    prev_operand: bool,
}

impl<'a> Parser<'a> {
    fn new(re: &'a str) -> Parser<'a> {
        Parser {
            re,
            chars: re.char_indices(),
            operands: Vec::new(),
            operators: Vec::new(),
            prev_operand: false,
        }
    }

    fn parse(mut self) -> Result<Expr, ParseError> {
        while let Some((offset, ch)) = self.chars.next() {
            if ch.is_ascii_whitespace() {
                continue;
            }

            match ch {
                '\\' => match self.chars.next() {
                    None => return Err(error(ParseErrorKind::DanglingEscape, offset)),
                    // Whitespace is dropped even when escaped.
                    Some((_, c)) if c.is_ascii_whitespace() => {},
                    Some((_, c)) => self.push_operand(Expr::Literal(c), offset),
                },
                '(' => {
                    self.push_implicit_concat(offset);
                    let floor = self.operands.len();
                    self.operators.push(Op::Group { offset, floor });
                    self.prev_operand = false;
                },
                ')' => self.close_group(offset)?,
                '*' | '+' | '?' => self.repeat(ch, offset)?,
                '|' => self.alternate(offset)?,
                '[' => {
                    let kind = self.bracket(offset)?;
                    self.push_operand(Expr::Class(kind), offset);
                },
                ']' => return Err(error(ParseErrorKind::InvalidBracket, offset)),
                _ => self.push_operand(Expr::Literal(ch), offset),
            }
        }

        self.finish()
    }

    fn push_implicit_concat(&mut self, offset: usize) {
        if self.prev_operand {
            self.operators.push(Op::Bin(BinOp::Concat, offset));
        }
    }

    fn push_operand(&mut self, expr: Expr, offset: usize) {
        self.push_implicit_concat(offset);
        self.operands.push(expr);
        self.prev_operand = true;
    }

    // The number of operands that belong to enclosing groups, and so are off-limits to the
    // operators at the top of the stack.
    fn floor(&self) -> usize {
        self.operators.iter().rev()
            .find_map(|op| match *op {
                Op::Group { floor, .. } => Some(floor),
                Op::Bin(..) => None,
            })
            .unwrap_or(0)
    }

    // Applies a binary operator to the top two operands.
    fn reduce(&mut self, op: BinOp, offset: usize) -> Result<(), ParseError> {
        let floor = self.floor();
        if self.operands.len() < floor + 2 {
            return Err(error(ParseErrorKind::MissingOperand, offset));
        }

        let right = self.operands.pop();
        let left = self.operands.pop();
        match (left, right) {
            (Some(left), Some(right)) => {
                let expr = match op {
                    BinOp::Concat => Expr::concat(left, right),
                    BinOp::Union => Expr::union(left, right),
                };
                trace!("reduced {:?} at offset {} into {}", op, offset, expr);
                self.operands.push(expr);
                Ok(())
            },
            _ => Err(error(ParseErrorKind::MissingOperand, offset)),
        }
    }

    fn close_group(&mut self, offset: usize) -> Result<(), ParseError> {
        loop {
            match self.operators.pop() {
                None => return Err(error(ParseErrorKind::UnmatchedCloseParen, offset)),
                Some(Op::Bin(op, op_offset)) => self.reduce(op, op_offset)?,
                Some(Op::Group { offset: open, floor }) => {
                    if self.operands.len() == floor {
                        return Err(error(ParseErrorKind::EmptyExpression, open));
                    }
                    debug_assert_eq!(self.operands.len(), floor + 1);
                    self.prev_operand = true;
                    return Ok(());
                },
            }
        }
    }

    fn repeat(&mut self, ch: char, offset: usize) -> Result<(), ParseError> {
        if !self.prev_operand {
            return Err(error(ParseErrorKind::NothingToRepeat, offset));
        }
        let inner = self.operands.pop()
            .ok_or_else(|| error(ParseErrorKind::NothingToRepeat, offset))?;
        let expr = match ch {
            '*' => Expr::star(inner),
            '+' => Expr::plus(inner),
            _ => Expr::optional(inner),
        };
        self.operands.push(expr);
        Ok(())
    }

    fn alternate(&mut self, offset: usize) -> Result<(), ParseError> {
        if !self.prev_operand {
            return Err(error(ParseErrorKind::MissingOperand, offset));
        }
        // Concatenation binds tighter than alternation, so finish off any pending ones.
        while let Some(&Op::Bin(BinOp::Concat, op_offset)) = self.operators.last() {
            self.operators.pop();
            self.reduce(BinOp::Concat, op_offset)?;
        }
        self.operators.push(Op::Bin(BinOp::Union, offset));
        self.prev_operand = false;
        Ok(())
    }

    // Parses the rest of a bracket expression whose `[` is at `offset`.
    fn bracket(&mut self, offset: usize) -> Result<ClassKind, ParseError> {
        let rest = &self.re[offset + 1..];
        let end = rest.find(']')
            .ok_or_else(|| error(ParseErrorKind::InvalidBracket, offset))?;
        let kind = ClassKind::from_bracket_contents(&rest[..end])
            .ok_or_else(|| error(ParseErrorKind::InvalidBracket, offset))?;

        // Skip the contents and the closing bracket.
        for _ in rest[..=end].chars() {
            self.chars.next();
        }
        Ok(kind)
    }

    fn finish(mut self) -> Result<Expr, ParseError> {
        while let Some(op) = self.operators.pop() {
            match op {
                Op::Group { offset, .. } => {
                    return Err(error(ParseErrorKind::UnclosedGroup, offset));
                },
                Op::Bin(op, offset) => self.reduce(op, offset)?,
            }
        }

        let len = self.re.len();
        match self.operands.len() {
            0 => Err(error(ParseErrorKind::EmptyExpression, len)),
            1 => self.operands.pop().ok_or_else(|| error(ParseErrorKind::EmptyExpression, len)),
            _ => Err(error(ParseErrorKind::MissingOperand, len)),
        }
    }
}

fn error(kind: ParseErrorKind, offset: usize) -> ParseError {
    ParseError::new(kind, offset)
}
