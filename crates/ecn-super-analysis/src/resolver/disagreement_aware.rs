//! Disagreement-aware resolution.
//!
//! One pass records whether ECN connections were ever seen working
//! (`works` or `transient`) and whether non-ECN connections were
//! (`works` or `broken`). Both → works, neither → offline. If only one side
//! worked, the group is broken/transient only when every observation says
//! exactly that; any other mix is weird.

use ecn_super_core::errors::ResolveError;
use ecn_super_core::types::{Condition, SuperCondition};

pub fn resolve(conditions: &[Condition]) -> Result<SuperCondition, ResolveError> {
    if conditions.is_empty() {
        return Err(ResolveError::EmptyConditionSet);
    }

    let mut ecn_seen_working = false;
    let mut no_ecn_seen_working = false;
    for condition in conditions {
        match condition {
            Condition::Works => {
                ecn_seen_working = true;
                no_ecn_seen_working = true;
            }
            Condition::Broken => no_ecn_seen_working = true,
            Condition::Transient => ecn_seen_working = true,
            Condition::Offline => {}
        }
    }

    let all = |expected: Condition| conditions.iter().all(|c| *c == expected);

    Ok(match (ecn_seen_working, no_ecn_seen_working) {
        (true, true) => SuperCondition::Works,
        (false, false) => SuperCondition::Offline,
        (false, true) if all(Condition::Broken) => SuperCondition::Broken,
        (true, false) if all(Condition::Transient) => SuperCondition::Transient,
        _ => SuperCondition::Weird,
    })
}
