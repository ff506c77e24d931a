// Copyright 2015 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::ParseError;
use crate::nfa::builder::NfaBuilder;
use crate::nfa::Nfa;
use crate::parser;
use std::fmt;
use std::mem;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// The characters that have a special meaning in a pattern, and so must be escaped to be
/// matched literally.
pub const RESERVED: &[char] = &['*', '+', '?', '|', '(', ')', '[', ']', '\\'];

/// One of the three supported character classes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ClassKind {
    /// `[a-z]`
    Lower,
    /// `[A-Z]`
    Upper,
    /// `[0-9]`
    Digit,
}

impl ClassKind {
    /// The characters belonging to this class.
    pub fn chars(&self) -> RangeInclusive<char> {
        match *self {
            ClassKind::Lower => 'a'..='z',
            ClassKind::Upper => 'A'..='Z',
            ClassKind::Digit => '0'..='9',
        }
    }

    /// The bracket expression for this class, for example `"[a-z]"`.
    pub fn as_str(&self) -> &'static str {
        match *self {
            ClassKind::Lower => "[a-z]",
            ClassKind::Upper => "[A-Z]",
            ClassKind::Digit => "[0-9]",
        }
    }

    /// Recognizes the inside of a bracket expression (for example `"a-z"`).
    pub(crate) fn from_bracket_contents(s: &str) -> Option<ClassKind> {
        match s {
            "a-z" => Some(ClassKind::Lower),
            "A-Z" => Some(ClassKind::Upper),
            "0-9" => Some(ClassKind::Digit),
            _ => None,
        }
    }
}

/// A parsed regular expression.
///
/// Every leaf is a `Literal` or a `Class`, and since children are owned the tree is always finite.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expr {
    Literal(char),
    Class(ClassKind),
    Concat(Box<Expr>, Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
    Optional(Box<Expr>),
}

impl Expr {
    /// Parses a pattern. This is the same as `regex_to_dfa::parse`.
    pub fn parse(re: &str) -> Result<Expr, ParseError> {
        parser::parse(re)
    }

    pub fn concat(left: Expr, right: Expr) -> Expr {
        Expr::Concat(Box::new(left), Box::new(right))
    }

    pub fn union(left: Expr, right: Expr) -> Expr {
        Expr::Union(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Expr) -> Expr {
        Expr::Star(Box::new(inner))
    }

    pub fn plus(inner: Expr) -> Expr {
        Expr::Plus(Box::new(inner))
    }

    pub fn optional(inner: Expr) -> Expr {
        Expr::Optional(Box::new(inner))
    }

    /// Builds an `Nfa` recognizing this expression, using Thompson's construction.
    ///
    /// The states of the result are numbered in the order that the construction allocated them.
    pub fn thompson(&self) -> Nfa {
        let mut builder = NfaBuilder::new();
        let frag = builder.add_expr(self);
        builder.to_automaton(frag)
    }

    /// Returns the number of nodes in this tree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(e) = stack.pop() {
            count += 1;
            match *e {
                Expr::Literal(_) | Expr::Class(_) => {},
                Expr::Concat(ref l, ref r) | Expr::Union(ref l, ref r) => {
                    stack.push(r);
                    stack.push(l);
                },
                Expr::Star(ref e) | Expr::Plus(ref e) | Expr::Optional(ref e) => stack.push(e),
            }
        }
        count
    }

    fn is_leaf(&self) -> bool {
        matches!(*self, Expr::Literal(_) | Expr::Class(_))
    }

    // True if dropping this node can't recurse more than one level.
    fn is_shallow(&self) -> bool {
        match *self {
            Expr::Literal(_) | Expr::Class(_) => true,
            Expr::Concat(ref l, ref r) | Expr::Union(ref l, ref r) => l.is_leaf() && r.is_leaf(),
            Expr::Star(ref e) | Expr::Plus(ref e) | Expr::Optional(ref e) => e.is_leaf(),
        }
    }
}

/// A long pattern makes a deep tree (a literal string is a chain of concatenations), so the
/// automatic drop glue could overflow the stack. Instead, we detach the children onto a heap
/// stack and drop the nodes one at a time.
impl Drop for Expr {
    fn drop(&mut self) {
        if self.is_shallow() {
            return;
        }

        let placeholder = || Expr::Literal('\0');
        let mut stack = vec![mem::replace(self, placeholder())];
        while let Some(mut expr) = stack.pop() {
            match expr {
                Expr::Literal(_) | Expr::Class(_) => {},
                Expr::Concat(ref mut l, ref mut r) | Expr::Union(ref mut l, ref mut r) => {
                    stack.push(mem::replace(&mut **l, placeholder()));
                    stack.push(mem::replace(&mut **r, placeholder()));
                },
                Expr::Star(ref mut e) | Expr::Plus(ref mut e) | Expr::Optional(ref mut e) => {
                    stack.push(mem::replace(&mut **e, placeholder()));
                },
            }
            // `expr` only has leaf children now, so dropping it returns straight away.
        }
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Expr, ParseError> {
        parser::parse(s)
    }
}

/// Writes the expression back out as a pattern.
///
/// Every binary node is parenthesized, so parsing the output gives back the same tree. The one
/// exception is a whitespace literal, which can't be written in a pattern at all.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        enum Piece<'a> {
            Expr(&'a Expr),
            Str(&'static str),
        }

        // Pieces are pushed in reverse, so that they pop off in the order they're written.
        let mut stack = vec![Piece::Expr(self)];
        while let Some(piece) = stack.pop() {
            let e = match piece {
                Piece::Str(s) => {
                    f.write_str(s)?;
                    continue;
                },
                Piece::Expr(e) => e,
            };
            match *e {
                Expr::Literal(c) => {
                    if RESERVED.contains(&c) {
                        write!(f, "\\{}", c)?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                },
                Expr::Class(k) => f.write_str(k.as_str())?,
                Expr::Concat(ref l, ref r) | Expr::Union(ref l, ref r) => {
                    stack.push(Piece::Str(")"));
                    stack.push(Piece::Expr(r));
                    if let Expr::Union(..) = *e {
                        stack.push(Piece::Str("|"));
                    }
                    stack.push(Piece::Expr(l));
                    stack.push(Piece::Str("("));
                },
                Expr::Star(ref inner) | Expr::Plus(ref inner) | Expr::Optional(ref inner) => {
                    stack.push(Piece::Str(match *e {
                        Expr::Star(_) => "*",
                        Expr::Plus(_) => "+",
                        _ => "?",
                    }));
                    stack.push(Piece::Expr(inner));
                },
            }
        }
        Ok(())
    }
}
