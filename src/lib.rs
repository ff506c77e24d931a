// Copyright 2015 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/*!
This crate compiles small regular expressions into finite automata. The pipeline has three
stages:

- `parse` turns a pattern into an `Expr` (the syntax tree),
- `Expr::thompson` turns the tree into an `Nfa` using Thompson's construction, and
- `Nfa::to_dfa` turns the `Nfa` into a `Dfa` using the subset construction.

The automata are plain data: there is no search engine here, only enough to run an automaton
over a whole string (which is handy for checking that the stages agree).

# Syntax

The supported syntax is deliberately small. Literal characters match themselves; `*`, `+` and
`?` are postfix repetitions; `|` is alternation; parentheses group; `[a-z]`, `[A-Z]` and `[0-9]`
are the only character classes; and `\` makes the next character literal. Whitespace is always
skipped, even after a backslash, so a space can never be matched.

# Example

```rust
use regex_to_dfa::Dfa;

let dfa = Dfa::from_regex("[a-z]+(-[0-9])?").unwrap();
assert!(dfa.accepts("abc-7"));
assert!(!dfa.accepts("abc-"));
```
*/

#[macro_use]
mod macros;

mod ast;
mod dfa;
mod error;
mod nfa;
mod parser;

pub use crate::ast::{ClassKind, Expr};
pub use crate::dfa::Dfa;
pub use crate::error::{Error, ParseError, ParseErrorKind};
pub use crate::nfa::Nfa;
pub use crate::parser::parse;

/// Identifies a state of an `Nfa` or a `Dfa`.
///
/// States are indices into the automaton's state list, so they are only meaningful for the
/// automaton they came from.
pub type StateIdx = usize;

/// A set of NFA states.
///
/// This is also the label of every state in a freshly determinized `Dfa`: each DFA state stands
/// for the set of NFA states that the NFA could simultaneously be in.
pub type StateSet = bit_set::BitSet;
