//! Configuration rules checked with `Validation`.

use crate::core::State;
use crate::validation::context::ConfigurationContext;
use crate::validation::violations::ConfigViolation;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Check a configuration, accumulating ALL violations.
///
/// Returns `Validation::Success(())` if every condition target and every
/// preferred-next hint names a registered state and no state prefers itself.
pub fn validate_configuration<S: State>(
    context: &ConfigurationContext<S>,
) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

    // A combined condition appears once per property; report each pair once.
    let mut seen: Vec<(&'static str, &S)> = Vec::new();
    for (property, target) in &context.condition_targets {
        if seen.contains(&(*property, target)) {
            continue;
        }
        seen.push((*property, target));

        if !context.is_registered(target) {
            checks.push(Validation::fail(ConfigViolation::UnregisteredTarget {
                property: property.to_string(),
                target: target.name().to_string(),
            }));
        }
    }

    for (state, next) in &context.preferred {
        if state == next {
            checks.push(Validation::fail(ConfigViolation::SelfPreferredNext {
                state: state.name().to_string(),
            }));
        } else if !context.is_registered(next) {
            checks.push(Validation::fail(ConfigViolation::UnregisteredPreferredNext {
                state: state.name().to_string(),
                next: next.name().to_string(),
            }));
        }
    }

    if checks.is_empty() {
        return Validation::success(());
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Flatten a validation result into the violations it reports.
pub fn violations(result: Validation<(), NonEmptyVec<ConfigViolation>>) -> Vec<ConfigViolation> {
    match result {
        Validation::Success(()) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
