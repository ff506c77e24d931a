// Copyright 2015-2016 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::ast::{ClassKind, Expr};
use crate::nfa::{Nfa, State};
use crate::{StateIdx, StateSet};
use std::collections::BTreeSet;

/// A piece of an automaton under construction: where it starts, and where it accepts.
///
/// Fragments never own their states; those live in the `NfaBuilder`, which only ever appends to
/// its list. So two fragments built by the same builder can never share a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    pub start: StateIdx,
    pub accept: StateSet,
}

/// Builds an `Nfa` from an `Expr` using Thompson's construction.
#[derive(Debug, Default)]
pub struct NfaBuilder {
    states: Vec<State>,
    alphabet: BTreeSet<char>,
    // For every state, whether some transition leads into it.
    has_incoming: Vec<bool>,
}

// A step of the post-order walk in `NfaBuilder::add_expr`.
enum Task<'a> {
    // Build the children of this node (or the node itself, if it is a leaf).
    Visit(&'a Expr),
    // Combine the fragments of this node's children, which are on top of the fragment stack.
    Finish(&'a Expr),
}

impl NfaBuilder {
    pub fn new() -> NfaBuilder {
        NfaBuilder::default()
    }

    /// Converts this `NfaBuilder` into an `Nfa` that starts and accepts where `frag` does.
    pub fn to_automaton(self, frag: Fragment) -> Nfa {
        debug!("built an NFA with {} states and {} symbols", self.states.len(), self.alphabet.len());
        Nfa::from_parts(self.states, self.alphabet, frag.start, frag.accept)
    }

    /// Allocates a new state. Its index is one more than that of the previous one.
    fn add_state(&mut self) -> StateIdx {
        self.states.push(State::default());
        self.has_incoming.push(false);
        self.states.len() - 1
    }

    fn add_transition(&mut self, from: StateIdx, to: StateIdx, ch: char) {
        self.states[from].consuming.push((ch, to));
        self.has_incoming[to] = true;
        self.alphabet.insert(ch);
    }

    fn add_eps(&mut self, from: StateIdx, to: StateIdx) {
        self.states[from].eps.push(to);
        self.has_incoming[to] = true;
    }

    /// Adds the states for `expr`, returning the fragment that recognizes it.
    ///
    /// The tree is walked with an explicit stack, so deeply nested expressions (like the
    /// concatenation chain of a long literal pattern) can't overflow the call stack. Children are
    /// built left to right before their parent, which fixes the order that states are allocated.
    pub fn add_expr(&mut self, expr: &Expr) -> Fragment {
        let mut tasks = vec![Task::Visit(expr)];
        let mut frags = Vec::<Fragment>::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit(e) => match *e {
                    Expr::Literal(ch) => frags.push(self.add_literal(ch)),
                    Expr::Class(kind) => frags.push(self.add_class(kind)),
                    Expr::Concat(ref l, ref r) | Expr::Union(ref l, ref r) => {
                        tasks.push(Task::Finish(e));
                        tasks.push(Task::Visit(r));
                        tasks.push(Task::Visit(l));
                    },
                    Expr::Star(ref inner) | Expr::Plus(ref inner) | Expr::Optional(ref inner) => {
                        tasks.push(Task::Finish(e));
                        tasks.push(Task::Visit(inner));
                    },
                },
                Task::Finish(e) => {
                    let frag = match *e {
                        Expr::Concat(..) | Expr::Union(..) => {
                            let (Some(right), Some(left)) = (frags.pop(), frags.pop()) else {
                                unreachable!("binary node without two fragments");
                            };
                            if let Expr::Concat(..) = *e {
                                self.add_concat(left, right)
                            } else {
                                self.add_union(left, right)
                            }
                        },
                        Expr::Star(_) | Expr::Plus(_) | Expr::Optional(_) => {
                            let Some(inner) = frags.pop() else {
                                unreachable!("repetition without a fragment");
                            };
                            match *e {
                                Expr::Star(_) => self.add_star(inner),
                                Expr::Plus(_) => self.add_plus(inner),
                                _ => self.add_optional(inner),
                            }
                        },
                        Expr::Literal(_) | Expr::Class(_) => unreachable!("leaves are never finished"),
                    };
                    frags.push(frag);
                },
            }
        }

        match frags.pop() {
            Some(frag) if frags.is_empty() => frag,
            _ => unreachable!("expression did not build exactly one fragment"),
        }
    }

    /// Two states, with a single transition between them.
    fn add_literal(&mut self, ch: char) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        self.add_transition(start, end, ch);
        Fragment { start, accept: single(end) }
    }

    /// Two states, with a transition for every character in the class. This accepts the same
    /// strings as the union of one literal per character, but without the extra states.
    fn add_class(&mut self, kind: ClassKind) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        for ch in kind.chars() {
            self.add_transition(start, end, ch);
        }
        Fragment { start, accept: single(end) }
    }

    fn add_concat(&mut self, left: Fragment, right: Fragment) -> Fragment {
        for s in &left.accept {
            self.add_eps(s, right.start);
        }
        Fragment { start: left.start, accept: right.accept }
    }

    fn add_union(&mut self, mut left: Fragment, right: Fragment) -> Fragment {
        let start = self.add_state();
        self.add_eps(start, left.start);
        self.add_eps(start, right.start);
        left.accept.union_with(&right.accept);
        Fragment { start, accept: left.accept }
    }

    fn add_star(&mut self, inner: Fragment) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();

        self.add_eps(start, inner.start);
        self.add_eps(start, end);
        for s in &inner.accept {
            self.add_eps(s, inner.start);
            self.add_eps(s, end);
        }
        Fragment { start, accept: single(end) }
    }

    fn add_plus(&mut self, inner: Fragment) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();

        // No shortcut from `start` to `end`: at least one repetition is required.
        self.add_eps(start, inner.start);
        for s in &inner.accept {
            self.add_eps(s, start);
            self.add_eps(s, end);
        }
        Fragment { start, accept: single(end) }
    }

    fn add_optional(&mut self, mut inner: Fragment) -> Fragment {
        // Making the start state accepting is only sound if nothing leads back into it. A `Plus`
        // at the end of `inner` loops back to its own start, which may be `inner.start`; in that
        // case we accept in a fresh state in front of it.
        let start = if self.has_incoming[inner.start] {
            let start = self.add_state();
            self.add_eps(start, inner.start);
            start
        } else {
            inner.start
        };
        inner.accept.insert(start);
        Fragment { start, accept: inner.accept }
    }
}

fn single(state: StateIdx) -> StateSet {
    let mut ret = StateSet::with_capacity(state + 1);
    ret.insert(state);
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::tests::Input;
    use crate::nfa::tests::trans_nfa;
    use quickcheck_macros::quickcheck;

    fn build(re: &str) -> (NfaBuilder, Fragment) {
        let mut b = NfaBuilder::new();
        let frag = b.add_expr(&Expr::parse(re).unwrap());
        (b, frag)
    }

    fn reachable(b: &NfaBuilder, start: StateIdx) -> StateSet {
        let mut ret = single(start);
        let mut stack = vec![start];
        while let Some(s) = stack.pop() {
            let st = &b.states[s];
            for t in st.eps.iter().cloned().chain(st.consuming.iter().map(|x| x.1)) {
                if ret.insert(t) {
                    stack.push(t);
                }
            }
        }
        ret
    }

    #[test]
    fn test_literal() {
        let nfa = Expr::Literal('a').thompson();
        let mut target = trans_nfa(2, &[(0, 1, Some('a'))]);
        target.set_accepting(1, true);
        assert_eq!(nfa, target);
    }

    #[test]
    fn test_concat_layout() {
        // >(0) --a--> (1) -eps-> (2) --b--> ((3))
        let nfa = Expr::parse("ab").unwrap().thompson();
        let mut target = trans_nfa(4, &[(0, 1, Some('a')), (2, 3, Some('b')), (1, 2, None)]);
        target.set_accepting(3, true);
        assert_eq!(nfa, target);
    }

    #[test]
    fn test_union_layout() {
        let nfa = Expr::parse("a|b").unwrap().thompson();
        assert_eq!(nfa.num_states(), 5);
        assert_eq!(nfa.init_state(), 4);
        assert_eq!(nfa.eps_transitions(4), &[0, 2]);
        assert_eq!(nfa.accept_states().iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_star_layout() {
        let nfa = Expr::parse("a*").unwrap().thompson();
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.init_state(), 2);
        assert_eq!(nfa.eps_transitions(2), &[0, 3]);
        assert_eq!(nfa.eps_transitions(1), &[0, 3]);
        assert_eq!(nfa.accept_states().iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_plus_layout() {
        let nfa = Expr::parse("a+").unwrap().thompson();
        assert_eq!(nfa.num_states(), 4);
        assert_eq!(nfa.init_state(), 2);
        assert_eq!(nfa.eps_transitions(2), &[0]);
        assert_eq!(nfa.eps_transitions(1), &[2, 3]);
        assert_eq!(nfa.accept_states().iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_optional_reuses_states() {
        let nfa = Expr::parse("a?").unwrap().thompson();
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.init_state(), 0);
        assert_eq!(nfa.accept_states().iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_optional_after_loop() {
        // `a+` loops back to its own start, which is also the start of the concatenation. If
        // that state became accepting, "a" would be accepted.
        let nfa = Expr::parse("(a+b)?").unwrap().thompson();
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("ab"));
        assert!(nfa.accepts("aaab"));
        assert!(!nfa.accepts("a"));
        assert!(!nfa.accepts("aa"));
    }

    #[test]
    fn test_class_is_fan_out() {
        let nfa = Expr::parse("[0-9]").unwrap().thompson();
        assert_eq!(nfa.num_states(), 2);
        assert_eq!(nfa.alphabet().len(), 10);
        for ch in '0'..='9' {
            assert_eq!(nfa.transitions(0, ch).collect::<Vec<_>>(), vec![1]);
        }
    }

    #[test]
    fn test_class_matches_union() {
        let class = Expr::parse("[A-Z]").unwrap().thompson();
        let union = ('B'..='Z').fold(Expr::Literal('A'), |acc, ch| Expr::union(acc, Expr::Literal(ch)))
            .thompson();
        for ch in (0u8..128).map(char::from) {
            let s = ch.to_string();
            assert_eq!(class.accepts(&s), union.accepts(&s), "{:?}", ch);
        }
        assert_eq!(class.alphabet(), union.alphabet());
    }

    #[test]
    fn test_fragments_are_disjoint() {
        let mut b = NfaBuilder::new();
        let left = b.add_expr(&Expr::parse("a*b").unwrap());
        let left_states = reachable(&b, left.start);
        let right = b.add_expr(&Expr::parse("(c|d)+").unwrap());
        let right_states = reachable(&b, right.start);
        assert!(left_states.is_disjoint(&right_states));
        assert_eq!(left_states.len() + right_states.len(), b.states.len());
    }

    #[test]
    fn test_states_allocated_in_order() {
        let (b, frag) = build("(ab|c)*");
        assert_eq!(reachable(&b, frag.start).len(), b.states.len());
        assert!(frag.accept.iter().all(|s| s < b.states.len()));
    }

    #[test]
    fn test_long_literal() {
        let re = "a".repeat(100_000);
        let nfa = Expr::parse(&re).unwrap().thompson();
        assert_eq!(nfa.num_states(), 200_000);
        assert_eq!(nfa.init_state(), 0);
        assert_eq!(nfa.accept_states().iter().collect::<Vec<_>>(), vec![199_999]);
    }

    #[test]
    fn test_long_star_chain() {
        let re = format!("a{}", "*".repeat(200_000));
        let nfa = Expr::parse(&re).unwrap().thompson();
        assert_eq!(nfa.num_states(), 2 + 2 * 200_000);
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaa"));
        assert!(!nfa.accepts("b"));
    }

    #[quickcheck]
    fn optional_accepts_empty(e: Expr, input: Input) -> bool {
        let plain = e.thompson();
        let opt = Expr::optional(e).thompson();
        opt.accepts("") && (input.0.is_empty() || opt.accepts(&input.0) == plain.accepts(&input.0))
    }

    #[quickcheck]
    fn concat_and_union_stay_disjoint(l: Expr, r: Expr) -> bool {
        let mut b = NfaBuilder::new();
        let left = b.add_expr(&l);
        let left_states = reachable(&b, left.start);
        let right = b.add_expr(&r);
        let right_states = reachable(&b, right.start);
        left_states.is_disjoint(&right_states)
    }
}
