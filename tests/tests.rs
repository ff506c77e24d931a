// Copyright 2015 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use regex_to_dfa::{Dfa, Error, Nfa, ParseErrorKind};
use serde_json::Value;

const INPUT: &str = include_str!("tests.json");

fn strings(test: &Value, key: &str) -> Vec<String> {
    test.get(key)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().map(|s| s.as_str().unwrap().to_owned()).collect())
        .unwrap_or_default()
}

fn error_kind(name: &str) -> ParseErrorKind {
    use ParseErrorKind::*;
    match name {
        "UnmatchedCloseParen" => UnmatchedCloseParen,
        "UnclosedGroup" => UnclosedGroup,
        "NothingToRepeat" => NothingToRepeat,
        "MissingOperand" => MissingOperand,
        "InvalidBracket" => InvalidBracket,
        "DanglingEscape" => DanglingEscape,
        "EmptyExpression" => EmptyExpression,
        _ => panic!("unknown error kind {:?}", name),
    }
}

#[test]
fn external_tests() {
    let val: Value = serde_json::from_str(INPUT).unwrap();
    let tests = val.as_array().unwrap();
    for test in tests {
        let re_str = test.get("pattern").unwrap().as_str().unwrap();
        println!("re: {:?}", re_str);

        if let Some(name) = test.get("error") {
            let kind = error_kind(name.as_str().unwrap());
            let offset = test.get("offset").unwrap().as_u64().unwrap() as usize;
            match Dfa::from_regex(re_str) {
                Err(Error::Parse(e)) => {
                    assert_eq!(e.kind(), kind, "{:?}", re_str);
                    assert_eq!(e.offset(), offset, "{:?}", re_str);
                },
                other => panic!("expected a parse error for {:?}, got {:?}", re_str, other),
            }
            continue;
        }

        let nfa = Nfa::from_regex(re_str).unwrap();
        let dfa = nfa.to_dfa();
        for text in strings(test, "accepts") {
            assert!(nfa.accepts(&text), "NFA for {:?} rejected {:?}", re_str, text);
            assert!(dfa.accepts(&text), "DFA for {:?} rejected {:?}", re_str, text);
        }
        for text in strings(test, "rejects") {
            assert!(!nfa.accepts(&text), "NFA for {:?} accepted {:?}", re_str, text);
            assert!(!dfa.accepts(&text), "DFA for {:?} accepted {:?}", re_str, text);
        }
    }
}

#[test]
fn dfa_states_are_reachable() {
    let dfa = Dfa::from_regex("(a|b)*abb").unwrap();
    let mut seen = vec![false; dfa.num_states()];
    let mut stack = vec![dfa.init_state()];
    seen[dfa.init_state()] = true;
    while let Some(s) = stack.pop() {
        for &ch in dfa.alphabet() {
            let t = dfa.next_state(s, ch).unwrap();
            if !seen[t] {
                seen[t] = true;
                stack.push(t);
            }
        }
    }
    assert!(seen.into_iter().all(|x| x));
}

#[test]
fn hand_built_nfa() {
    // Accepts an even number of 'x's.
    let mut nfa = Nfa::new();
    let odd = nfa.add_state();
    nfa.add_transition(0, odd, 'x');
    nfa.add_transition(odd, 0, 'x');
    nfa.set_accepting(0, true);

    let dfa = nfa.to_dfa().numbered();
    assert_eq!(dfa.num_states(), 2);
    assert!(dfa.accepts(""));
    assert!(dfa.accepts("xxxx"));
    assert!(!dfa.accepts("xxx"));
    assert!(!dfa.accepts("y"));
}

#[test]
fn error_messages() {
    let err = Dfa::from_regex("a(b").unwrap_err();
    assert_eq!(err.to_string(), "Regex syntax error: unclosed '(' at offset 1");
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(Dfa::from_regex_bounded("abc", 2).unwrap_err().to_string(), "State overflow");
}

#[test]
fn long_patterns_compile() {
    let re = "ab".repeat(1_000);
    let dfa = Dfa::from_regex(&re).unwrap();
    assert!(dfa.accepts(&re));
    assert!(!dfa.accepts(&re[1..]));
    assert_eq!(dfa.num_states(), 2_000 + 2);

    let expr = regex_to_dfa::parse(&"x".repeat(100_000)).unwrap();
    let nfa = expr.thompson();
    drop(expr);
    assert_eq!(nfa.num_states(), 200_000);
}
