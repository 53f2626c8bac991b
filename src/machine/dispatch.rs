//! Choosing the move for one property change.
//!
//! Resolution is pure: it sees the active state, its preferred-next hint and
//! the candidate conditions, and asks the caller to evaluate conditions.

use crate::core::{Condition, State};
use crate::subject::Subject;
use std::rc::Rc;

/// Which pass produced a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pass {
    /// The condition targeting the active state's hint held.
    Preferred,
    /// At least one non-self condition held.
    Fallback,
}

/// Outcome of resolution: move to `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Decision<Id> {
    pub target: Id,
    pub pass: Pass,
    /// Fallback only: the target of the last condition that held, when a
    /// later-registered condition that did not hold took the target slot.
    pub shadowed: Option<Id>,
}

/// Resolve a property change into at most one move.
///
/// 1. If `preferred` is set and a candidate targets it, only the first such
///    candidate is evaluated; it decides alone.
/// 2. Otherwise every candidate whose target is not `current` is evaluated.
///    The move happens if any held, and goes to the target of the **last**
///    evaluated candidate, whether or not that one held.
///
/// Rule 2 lets a later registration win over an earlier one that was the
/// condition actually satisfied; [`Decision::shadowed`] reports when that
/// happened.
pub fn resolve<S, Id, F>(
    current: &Id,
    preferred: Option<&Id>,
    candidates: &[Rc<Condition<S, Id>>],
    mut evaluate: F,
) -> Option<Decision<Id>>
where
    S: Subject,
    Id: State,
    F: FnMut(&Condition<S, Id>) -> bool,
{
    if let Some(hint) = preferred {
        if let Some(condition) = candidates.iter().find(|c| c.target() == hint) {
            return evaluate(&**condition).then(|| Decision {
                target: hint.clone(),
                pass: Pass::Preferred,
                shadowed: None,
            });
        }
    }

    let mut satisfied = false;
    let mut recorded: Option<(&Id, bool)> = None;
    let mut last_satisfied: Option<&Id> = None;

    for condition in candidates.iter().filter(|c| c.target() != current) {
        let result = evaluate(&**condition);
        satisfied |= result;
        if result {
            last_satisfied = Some(condition.target());
        }
        recorded = Some((condition.target(), result));
    }

    if !satisfied {
        return None;
    }

    let (target, held) = recorded?;
    let shadowed = if held {
        None
    } else {
        last_satisfied.filter(|id| *id != target).cloned()
    };

    Some(Decision {
        target: target.clone(),
        pass: Pass::Fallback,
        shadowed,
    })
}
