// Copyright 2015-2016 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::ast::Expr;
use crate::error::ParseError;
use crate::{StateIdx, StateSet};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};
use std::mem;

pub mod builder;
mod determinize;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct State {
    // The transitions that consume input.
    pub consuming: Vec<(char, StateIdx)>,
    // Transitions that do not consume input.
    pub eps: Vec<StateIdx>,
}

/// A non-deterministic finite automaton.
///
/// States are numbered from zero, and there is always at least one of them. Transitions either
/// consume a single `char` or consume nothing (epsilon transitions); the latter are kept separate
/// from the consuming ones, and epsilon is never part of the alphabet.
///
/// There is no support for searching with an `Nfa`. You can ask whether it accepts a whole string
/// (see `accepts`), but mainly it exists to be turned into a `Dfa` with `to_dfa`.
#[derive(Clone, Eq, PartialEq)]
pub struct Nfa {
    states: Vec<State>,
    alphabet: BTreeSet<char>,
    init: StateIdx,
    accept: StateSet,
}

impl Nfa {
    /// Creates an `Nfa` with a single, non-accepting, state. That state is the initial state.
    pub fn new() -> Nfa {
        Nfa {
            states: vec![State::default()],
            alphabet: BTreeSet::new(),
            init: 0,
            accept: StateSet::new(),
        }
    }

    /// Parses a pattern and builds an `Nfa` for it using Thompson's construction.
    pub fn from_regex(re: &str) -> Result<Nfa, ParseError> {
        Ok(Expr::parse(re)?.thompson())
    }

    // Assembles an `Nfa` from parts that already satisfy its invariants.
    pub(crate) fn from_parts(
        states: Vec<State>,
        alphabet: BTreeSet<char>,
        init: StateIdx,
        accept: StateSet,
    ) -> Nfa {
        debug_assert!(init < states.len());
        debug_assert!(accept.iter().all(|s| s < states.len()));
        Nfa { states, alphabet, init, accept }
    }

    /// Adds a new state and returns its index.
    pub fn add_state(&mut self) -> StateIdx {
        self.states.push(State::default());
        self.states.len() - 1
    }

    /// Adds a transition that moves from `from` to `to` on consuming `ch`.
    ///
    /// # Panics
    /// - if either state doesn't exist.
    pub fn add_transition(&mut self, from: StateIdx, to: StateIdx, ch: char) {
        assert!(to < self.states.len(), "no such state: {}", to);
        self.states[from].consuming.push((ch, to));
        self.alphabet.insert(ch);
    }

    /// Adds an epsilon transition from `from` to `to`.
    ///
    /// # Panics
    /// - if either state doesn't exist.
    pub fn add_eps(&mut self, from: StateIdx, to: StateIdx) {
        assert!(to < self.states.len(), "no such state: {}", to);
        self.states[from].eps.push(to);
    }

    /// Makes `state` the initial state.
    pub fn set_init(&mut self, state: StateIdx) {
        assert!(state < self.states.len(), "no such state: {}", state);
        self.init = state;
    }

    /// Sets whether `state` is accepting.
    pub fn set_accepting(&mut self, state: StateIdx, accepting: bool) {
        assert!(state < self.states.len(), "no such state: {}", state);
        if accepting {
            self.accept.insert(state);
        } else {
            self.accept.remove(state);
        }
    }

    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn init_state(&self) -> StateIdx {
        self.init
    }

    /// The set of accepting states.
    pub fn accept_states(&self) -> &StateSet {
        &self.accept
    }

    pub fn is_accepting(&self, state: StateIdx) -> bool {
        self.accept.contains(state)
    }

    /// The symbols appearing on consuming transitions, in sorted order.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// Returns the states reachable from `state` by consuming `ch`.
    pub fn transitions(&self, state: StateIdx, ch: char) -> impl Iterator<Item = StateIdx> + '_ {
        self.states[state]
            .consuming
            .iter()
            .filter(move |&&(c, _)| c == ch)
            .map(|&(_, target)| target)
    }

    /// Returns the targets of the epsilon transitions out of `state`.
    pub fn eps_transitions(&self, state: StateIdx) -> &[StateIdx] {
        &self.states[state].eps
    }

    /// Returns the set of states reachable from `state` using only epsilon transitions. This
    /// always includes `state` itself.
    pub fn epsilon_closure(&self, state: StateIdx) -> StateSet {
        let mut set = StateSet::with_capacity(self.states.len());
        set.insert(state);
        self.eps_closure(&set)
    }

    /// Returns the set of states reachable from some element of `states` using only epsilon
    /// transitions.
    pub fn eps_closure(&self, states: &StateSet) -> StateSet {
        let mut ret = states.clone();
        let mut stack: Vec<StateIdx> = states.iter().collect();

        while let Some(s) = stack.pop() {
            for &t in &self.states[s].eps {
                if ret.insert(t) {
                    stack.push(t);
                }
            }
        }

        ret
    }

    /// Returns the set of states that can be reached from some element of `states` by consuming
    /// `ch`. No epsilon transitions are followed, either before or after consuming `ch`.
    pub fn step(&self, states: &StateSet, ch: char) -> StateSet {
        let mut ret = StateSet::with_capacity(self.states.len());
        for s in states {
            ret.extend(self.transitions(s, ch));
        }
        ret
    }

    /// Does this automaton accept the whole of `input`?
    ///
    /// This simulates the automaton by keeping track of all the states it could be in. It's slow,
    /// but it's simple, which makes it useful for checking the output of `to_dfa`.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.epsilon_closure(self.init);
        let mut next = StateSet::with_capacity(self.states.len());

        for ch in input.chars() {
            next.clear();
            for s in self.step(&current, ch).iter() {
                next.union_with(&self.epsilon_closure(s));
            }
            mem::swap(&mut current, &mut next);
            if current.is_empty() {
                return false;
            }
        }

        !current.is_disjoint(&self.accept)
    }
}

impl Default for Nfa {
    fn default() -> Nfa {
        Nfa::new()
    }
}

impl Debug for Nfa {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Nfa ({} states):", self.states.len())?;
        writeln!(f, "Init: {}", self.init)?;
        writeln!(f, "Accept: {{{}}}", self.accept.iter().join(", "))?;

        for (st_idx, st) in self.states.iter().enumerate().take(40) {
            writeln!(f, "\tState {}:", st_idx)?;
            if !st.consuming.is_empty() {
                // Cap it at 10 transitions, since it gets unreadable otherwise.
                let shown = st.consuming.iter().take(10).map(|&(c, t)| format!("{:?} => {}", c, t));
                write!(f, "\t\tConsuming: {}", shown.format(", "))?;
                if st.consuming.len() > 10 {
                    f.write_str(", ...")?;
                }
                f.write_str("\n")?;
            }
            if !st.eps.is_empty() {
                writeln!(f, "\t\tEps: {}", st.eps.iter().join(", "))?;
            }
        }
        if self.states.len() > 40 {
            writeln!(f, "\t... ({} more states)", self.states.len() - 40)?;
        }
        Ok(())
    }
}
