// Copyright 2015-2016 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dfa::Dfa;
use crate::error::Error;
use crate::nfa::Nfa;
use crate::{StateIdx, StateSet};
use std::collections::HashMap;

impl Nfa {
    /// Creates a deterministic automaton accepting the same strings, using the subset
    /// construction.
    ///
    /// Each state of the result is labelled by the (epsilon-closed) set of NFA states that it
    /// represents. Only states reachable from the initial state are created, but that includes
    /// the dead state (labelled by the empty set) if some input leads there.
    pub fn to_dfa(&self) -> Dfa<StateSet> {
        match self.determinize(usize::MAX) {
            Ok(dfa) => dfa,
            // Only the bound on the number of states can make determinization fail.
            Err(_) => unreachable!("unbounded determinization ran out of states"),
        }
    }

    /// Like `to_dfa`, but fails with `Error::TooManyStates` instead of making more than
    /// `max_states` states.
    pub fn to_dfa_bounded(&self, max_states: usize) -> Result<Dfa<StateSet>, Error> {
        self.determinize(max_states)
    }

    fn determinize(&self, max_states: usize) -> Result<Dfa<StateSet>, Error> {
        let alphabet: Vec<char> = self.alphabet().iter().cloned().collect();
        let mut ret = Dfa::with_alphabet(alphabet.clone());
        let mut state_map = HashMap::<StateSet, StateIdx>::new();
        let mut active_states = Vec::<(StateIdx, StateSet)>::new();

        let mut add_state = |s: StateSet, dfa: &mut Dfa<StateSet>, active: &mut Vec<_>|
        -> Result<StateIdx, Error> {
            if let Some(&idx) = state_map.get(&s) {
                Ok(idx)
            } else if dfa.num_states() >= max_states {
                Err(Error::TooManyStates)
            } else {
                let accept = !s.is_disjoint(self.accept_states());
                let empty = s.is_empty();
                let idx = dfa.add_state(s.clone(), accept);
                if empty {
                    dfa.set_dead_state(idx);
                }
                active.push((idx, s.clone()));
                state_map.insert(s, idx);
                Ok(idx)
            }
        };

        // The initial state is added first, so it gets index zero.
        let init = self.epsilon_closure(self.init_state());
        add_state(init, &mut ret, &mut active_states)?;

        while let Some((state_idx, state)) = active_states.pop() {
            for (sym_idx, &ch) in alphabet.iter().enumerate() {
                let moved = self.step(&state, ch);
                let target = self.eps_closure(&moved);
                let target_idx = add_state(target, &mut ret, &mut active_states)?;
                ret.set_transition(state_idx, sym_idx, target_idx);
            }
        }

        debug_assert!(ret.is_total());
        debug!("determinized {} NFA states into {} DFA states", self.num_states(), ret.num_states());
        Ok(ret)
    }
}
