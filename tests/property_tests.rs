//! Property-based tests for combinators, dispatch and the engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use proptest::prelude::*;
use statewatch::core::{Clause, Combinator, Condition, State, StateHistory, StateTransition};
use statewatch::machine::StateMachine;
use statewatch::subject::{Observable, Subject};
use statewatch::{property, state_enum};
use std::rc::Rc;

state_enum! {
    enum TestState {
        Empty,
        Middle,
        Filled,
    }
}

#[derive(Default)]
struct Pair {
    first: String,
    second: String,
}

impl Subject for Pair {
    const PROPERTIES: &'static [&'static str] = &["first", "second"];
}

prop_compose! {
    fn arbitrary_state()(variant in 0..3u8) -> TestState {
        match variant {
            0 => TestState::Empty,
            1 => TestState::Middle,
            _ => TestState::Filled,
        }
    }
}

fn short_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z]{1,6}"]
}

/// Two states with one condition each: every move is unambiguous.
fn pair_machine(pair: &Rc<Observable<Pair>>) -> StateMachine<Pair, TestState> {
    let first = property!(Pair, first: String);
    let second = property!(Pair, second: String);
    let blank = |v: &String| v.is_empty();
    let present = |v: &String| !v.is_empty();

    let machine = StateMachine::new(pair);
    machine.configure_state(TestState::Empty).unwrap().build();
    machine.configure_state(TestState::Filled).unwrap().build();

    machine
        .all(
            TestState::Empty,
            vec![
                Clause::new(&first, blank).unwrap(),
                Clause::new(&second, blank).unwrap(),
            ],
        )
        .unwrap();
    machine
        .all(
            TestState::Filled,
            vec![
                Clause::new(&first, present).unwrap(),
                Clause::new(&second, present).unwrap(),
            ],
        )
        .unwrap();
    machine
}

proptest! {
    #[test]
    fn and_fold_matches_all(results in prop::collection::vec(any::<bool>(), 1..8)) {
        let expected = results.iter().all(|r| *r);
        prop_assert_eq!(Combinator::And.fold(results), expected);
    }

    #[test]
    fn or_fold_matches_any(results in prop::collection::vec(any::<bool>(), 0..8)) {
        let expected = results.iter().any(|r| *r);
        prop_assert_eq!(Combinator::Or.fold(results), expected);
    }

    #[test]
    fn combinator_parsing_ignores_case(upper in any::<bool>(), and in any::<bool>()) {
        let text = match (and, upper) {
            (true, true) => "AND",
            (true, false) => "and",
            (false, true) => "OR",
            (false, false) => "or",
        };
        let expected = if and { Combinator::And } else { Combinator::Or };
        prop_assert_eq!(text.parse::<Combinator>(), Ok(expected));
    }

    #[test]
    fn combined_clause_reads_current_values(first in short_text(), second in short_text()) {
        let pair = Pair { first: first.clone(), second: second.clone() };
        let clauses = || vec![
            Clause::new(&property!(Pair, first: String), |v: &String| v.is_empty()).unwrap(),
            Clause::new(&property!(Pair, second: String), |v: &String| v.is_empty()).unwrap(),
        ];

        let and = Condition::combined(Combinator::And, clauses(), TestState::Empty);
        let or = Condition::combined(Combinator::Or, clauses(), TestState::Middle);

        prop_assert_eq!(and.check(&pair), first.is_empty() && second.is_empty());
        prop_assert_eq!(or.check(&pair), first.is_empty() || second.is_empty());
    }

    #[test]
    fn state_follows_complete_or_cleared_fields(
        edits in prop::collection::vec((any::<bool>(), short_text()), 1..20)
    ) {
        let pair = Observable::new(Pair::default());
        let machine = pair_machine(&pair);
        let first = property!(Pair, first: String);
        let second = property!(Pair, second: String);
        machine.initialize(TestState::Empty).unwrap();

        let mut expected = TestState::Empty;
        for (edit_first, value) in edits {
            let property = if edit_first { &first } else { &second };
            pair.set(property, value).unwrap();

            let (a, b) = pair.read(|p| (p.first.is_empty(), p.second.is_empty()));
            match (a, b) {
                (true, true) => expected = TestState::Empty,
                (false, false) => expected = TestState::Filled,
                _ => {}
            }
            prop_assert_eq!(machine.current_state(), Some(expected));
        }
    }

    #[test]
    fn current_state_is_always_registered(
        moves in prop::collection::vec(arbitrary_state(), 0..10)
    ) {
        let pair = Observable::new(Pair::default());
        let machine: StateMachine<Pair, TestState> = StateMachine::new(&pair);
        machine.configure_state(TestState::Empty).unwrap().build();
        machine.configure_state(TestState::Filled).unwrap().build();
        machine.initialize(TestState::Empty).unwrap();

        let mut expected = TestState::Empty;
        for target in moves {
            let result = machine.move_to(target);
            if target == TestState::Middle {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
                expected = target;
            }
            prop_assert_eq!(machine.current_state(), Some(expected));
        }
    }

    #[test]
    fn state_name_is_stable(state in arbitrary_state()) {
        let name1 = state.name().to_string();
        let name2 = state.name().to_string();
        prop_assert_eq!(name1, name2);
    }

    #[test]
    fn history_preserves_order(
        transitions in prop::collection::vec(arbitrary_state(), 1..10)
    ) {
        let mut history = StateHistory::new();
        let mut expected_path = Vec::new();

        for (i, to_state) in transitions.iter().enumerate() {
            let from = if i == 0 { None } else { Some(transitions[i - 1]) };

            history = history.record(StateTransition {
                from,
                to: *to_state,
                trigger: None,
                timestamp: Utc::now(),
            });
            expected_path.push(*to_state);
        }

        let path = history.get_path();
        prop_assert_eq!(path.len(), expected_path.len());

        for (i, state) in path.iter().enumerate() {
            prop_assert_eq!(*state, &expected_path[i]);
        }
    }

    #[test]
    fn bounded_history_never_exceeds_capacity(
        capacity in 1..5usize,
        transitions in prop::collection::vec(arbitrary_state(), 0..12)
    ) {
        let mut history = StateHistory::bounded(capacity);
        for to in &transitions {
            history = history.record(StateTransition {
                from: None,
                to: *to,
                trigger: None,
                timestamp: Utc::now(),
            });
        }

        prop_assert_eq!(history.transitions().len(), transitions.len().min(capacity));
        if let Some(last) = transitions.last() {
            prop_assert_eq!(history.last().map(|t| t.to), Some(*last));
        }
    }

    #[test]
    fn history_record_is_pure(state1 in arbitrary_state(), state2 in arbitrary_state()) {
        let history = StateHistory::new();

        let new_history = history.record(StateTransition {
            from: Some(state1),
            to: state2,
            trigger: Some("first".to_string()),
            timestamp: Utc::now(),
        });

        // Original history unchanged
        prop_assert_eq!(history.transitions().len(), 0);
        // New history has the transition
        prop_assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}
