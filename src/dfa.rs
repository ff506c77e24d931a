// Copyright 2015 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::error::Error;
use crate::nfa::Nfa;
use crate::{StateIdx, StateSet};
use itertools::Itertools;
use std::fmt::{self, Debug, Formatter};

/// A deterministic finite automaton.
///
/// Every state has exactly one transition for every symbol of the alphabet; in other words, the
/// transition function is total. Each state also carries a label of type `S`. A `Dfa` made by
/// `Nfa::to_dfa` is labelled by the set of NFA states that each DFA state stands for; use
/// `remap_states` to swap those labels for something more convenient.
///
/// If the automaton has a state that can never reach an accepting state because it came from
/// the empty set of NFA states, that state is the "dead" state (see `dead_state`). It is never
/// accepting and all of its transitions lead back to itself.
#[derive(Clone, Eq, PartialEq)]
pub struct Dfa<S> {
    // Sorted, so that we can find a symbol's column by binary search.
    alphabet: Vec<char>,
    labels: Vec<S>,
    accept: StateSet,
    // The transition table, with one row per state and one column per symbol.
    table: Vec<StateIdx>,
    init: StateIdx,
    dead: Option<StateIdx>,
}

impl Dfa<StateSet> {
    /// Parses a pattern and compiles it all the way to a `Dfa`.
    pub fn from_regex(re: &str) -> Result<Dfa<StateSet>, Error> {
        Dfa::from_regex_bounded(re, usize::MAX)
    }

    /// Like `from_regex`, but fails with `Error::TooManyStates` rather than creating a `Dfa` with
    /// more than `max_states` states.
    pub fn from_regex_bounded(re: &str, max_states: usize) -> Result<Dfa<StateSet>, Error> {
        let nfa = Nfa::from_regex(re)?;
        nfa.to_dfa_bounded(max_states)
    }
}

impl<S> Dfa<S> {
    /// Returns a `Dfa` with no states over the given (sorted, duplicate-free) alphabet.
    ///
    /// This is not a valid `Dfa` until the initial state has been added and every transition has
    /// been set.
    pub(crate) fn with_alphabet(alphabet: Vec<char>) -> Dfa<S> {
        debug_assert!(alphabet.windows(2).all(|w| w[0] < w[1]));
        Dfa {
            alphabet,
            labels: Vec::new(),
            accept: StateSet::new(),
            table: Vec::new(),
            init: 0,
            dead: None,
        }
    }

    /// Adds a new state with dangling transitions and returns its index.
    pub(crate) fn add_state(&mut self, label: S, accept: bool) -> StateIdx {
        let idx = self.labels.len();
        self.labels.push(label);
        if accept {
            self.accept.insert(idx);
        }
        self.table.extend(self.alphabet.iter().map(|_| StateIdx::MAX));
        idx
    }

    /// Sets the transition from `from` on the `sym_idx`th symbol of the alphabet.
    pub(crate) fn set_transition(&mut self, from: StateIdx, sym_idx: usize, to: StateIdx) {
        let width = self.alphabet.len();
        self.table[from * width + sym_idx] = to;
    }

    pub(crate) fn set_dead_state(&mut self, state: StateIdx) {
        debug_assert!(!self.accept.contains(state));
        self.dead = Some(state);
    }

    /// Returns the number of states.
    pub fn num_states(&self) -> usize {
        self.labels.len()
    }

    /// The symbols this automaton has transitions on, in sorted order.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn init_state(&self) -> StateIdx {
        self.init
    }

    /// The label of the given state.
    pub fn label(&self, state: StateIdx) -> &S {
        &self.labels[state]
    }

    /// The labels of all states, indexed by state.
    pub fn labels(&self) -> &[S] {
        &self.labels
    }

    /// Finds the first state with the given label.
    pub fn find_state(&self, label: &S) -> Option<StateIdx>
    where S: PartialEq {
        self.labels.iter().position(|l| l == label)
    }

    pub fn is_accepting(&self, state: StateIdx) -> bool {
        self.accept.contains(state)
    }

    /// The accepting states, in increasing order.
    pub fn accept_states(&self) -> impl Iterator<Item = StateIdx> + '_ {
        self.accept.iter()
    }

    /// The dead state, if there is one.
    pub fn dead_state(&self) -> Option<StateIdx> {
        self.dead
    }

    /// Returns the position of `ch` in the alphabet.
    pub fn symbol_index(&self, ch: char) -> Option<usize> {
        self.alphabet.binary_search(&ch).ok()
    }

    /// Returns the state that we move to from `state` on consuming `ch`.
    ///
    /// Because the transition function is total, this only returns `None` if `ch` isn't in the
    /// alphabet.
    pub fn next_state(&self, state: StateIdx, ch: char) -> Option<StateIdx> {
        self.symbol_index(ch).map(|i| self.table[state * self.alphabet.len() + i])
    }

    /// Runs the automaton over all of `input`, starting from `state`, and returns the state it
    /// ends up in. Returns `None` if some character of `input` is not in the alphabet.
    pub fn run(&self, state: StateIdx, input: &str) -> Option<StateIdx> {
        input.chars().try_fold(state, |s, ch| self.next_state(s, ch))
    }

    /// Does this automaton accept the whole of `input`?
    pub fn accepts(&self, input: &str) -> bool {
        self.run(self.init, input).map_or(false, |s| self.is_accepting(s))
    }

    /// Replaces the label of every state with `f(label)`.
    ///
    /// `f` is called once per state, in order of state index, so a counter in `f` can be used to
    /// number the states. The transitions, the initial state, the accepting states and the dead
    /// state are unchanged.
    pub fn remap_states<T, F>(self, f: F) -> Dfa<T>
    where F: FnMut(S) -> T {
        Dfa {
            alphabet: self.alphabet,
            labels: self.labels.into_iter().map(f).collect(),
            accept: self.accept,
            table: self.table,
            init: self.init,
            dead: self.dead,
        }
    }

    /// Relabels every state by its own index.
    pub fn numbered(self) -> Dfa<StateIdx> {
        let mut next = 0;
        self.remap_states(|_| {
            next += 1;
            next - 1
        })
    }

    // Checks that every transition has been set and leads somewhere.
    pub(crate) fn is_total(&self) -> bool {
        self.table.len() == self.labels.len() * self.alphabet.len()
            && self.table.iter().all(|&t| t < self.labels.len())
    }
}

impl<S: Debug> Debug for Dfa<S> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "Dfa ({} states):", self.labels.len())?;
        writeln!(f, "Alphabet: {:?}", self.alphabet.iter().join(""))?;
        writeln!(f, "Init: {}", self.init)?;

        for (st_idx, label) in self.labels.iter().enumerate() {
            let accept = if self.is_accepting(st_idx) { " (accepting)" } else { "" };
            let dead = if self.dead == Some(st_idx) { " (dead)" } else { "" };
            writeln!(f, "\tState {} {:?}{}{}:", st_idx, label, accept, dead)?;

            // Group the symbols by target, so that classes don't take up a line per character.
            let width = self.alphabet.len();
            let row = &self.table[st_idx * width..(st_idx + 1) * width];
            let by_target = row.iter()
                .zip(&self.alphabet)
                .map(|(&tgt, &ch)| (tgt, ch))
                .sorted()
                .group_by(|&(tgt, _)| tgt);
            for (tgt, group) in &by_target {
                writeln!(f, "\t\t{} => {}", group.map(|(_, ch)| ch).join(""), tgt)?;
            }
        }
        Ok(())
    }
}
