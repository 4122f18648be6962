//! First-seen consensus resolution.
//!
//! Any `works` wins outright. Otherwise the first label is the candidate
//! and the first disagreeing label collapses it to `transient`.

use ecn_super_core::errors::ResolveError;
use ecn_super_core::types::{Condition, SuperCondition};

pub fn resolve(conditions: &[Condition]) -> Result<SuperCondition, ResolveError> {
    if conditions.contains(&Condition::Works) {
        return Ok(SuperCondition::Works);
    }

    let (first, rest) = conditions
        .split_first()
        .ok_or(ResolveError::EmptyConditionSet)?;

    let candidate = if rest.iter().all(|c| c == first) {
        *first
    } else {
        Condition::Transient
    };
    Ok(candidate.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use Condition::*;

    #[test]
    fn works_short_circuits() {
        assert_eq!(resolve(&[Offline, Broken, Works]), Ok(SuperCondition::Works));
    }

    #[test]
    fn mismatch_becomes_transient() {
        assert_eq!(resolve(&[Broken, Transient]), Ok(SuperCondition::Transient));
    }

    #[test]
    fn single_offline() {
        assert_eq!(resolve(&[Offline]), Ok(SuperCondition::Offline));
    }

    #[test]
    fn uniform_broken() {
        assert_eq!(resolve(&[Broken, Broken, Broken]), Ok(SuperCondition::Broken));
    }

    #[test]
    fn empty_is_a_defect() {
        assert_eq!(resolve(&[]), Err(ResolveError::EmptyConditionSet));
    }
}
