// Copyright 2015-2016 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error;
use std::fmt;

/// The different ways that a pattern can fail to parse.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParseErrorKind {
    /// A `)` with no `(` to match it.
    UnmatchedCloseParen,
    /// A `(` that was never closed.
    UnclosedGroup,
    /// A `*`, `+` or `?` with nothing before it to repeat.
    NothingToRepeat,
    /// A `|` (or an implicit concatenation) that is missing one of its operands.
    MissingOperand,
    /// A bracket expression other than `[a-z]`, `[A-Z]` or `[0-9]`, or a stray `]`.
    InvalidBracket,
    /// A `\` at the very end of the pattern.
    DanglingEscape,
    /// The pattern (or a group inside it) contains nothing to match.
    EmptyExpression,
}

/// An error that occurred while parsing a pattern.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError { kind, offset }
    }

    /// What went wrong.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The byte offset into the pattern at which the problem was noticed.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ParseErrorKind::*;

        let msg = match self.kind {
            UnmatchedCloseParen => "unmatched ')'",
            UnclosedGroup => "unclosed '('",
            NothingToRepeat => "repetition operator with nothing to repeat",
            MissingOperand => "operator is missing an operand",
            InvalidBracket => "invalid bracket expression (expected [a-z], [A-Z] or [0-9])",
            DanglingEscape => "dangling '\\' at end of pattern",
            EmptyExpression => "empty expression",
        };
        write!(f, "{} at offset {}", msg, self.offset)
    }
}

impl error::Error for ParseError {}

#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    TooManyStates,
}

use crate::error::Error::*;
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Parse(ref e) => write!(f, "Regex syntax error: {}", e),
            TooManyStates => write!(f, "State overflow"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Parse(ref e) => Some(e),
            TooManyStates => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Error {
        Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn display_includes_offset() {
        let e = ParseError::new(ParseErrorKind::UnmatchedCloseParen, 3);
        assert_eq!(e.to_string(), "unmatched ')' at offset 3");
    }

    #[test]
    fn parse_error_is_the_source() {
        let e: Error = ParseError::new(ParseErrorKind::DanglingEscape, 1).into();
        assert!(e.source().is_some());
        assert!(Error::TooManyStates.source().is_none());
        assert!(e.to_string().starts_with("Regex syntax error: dangling"));
    }
}
