//! Condition resolution: a multiset of condition labels → one super
//! condition.
//!
//! Two policies exist and disagree on mixed input; which one runs is a
//! configuration choice. Labels are parsed against the input vocabulary
//! first, under either policy, so an unknown label is always reported.

pub mod disagreement_aware;
pub mod first_seen;

use ecn_super_core::config::ResolutionPolicy;
use ecn_super_core::errors::ResolveError;
use ecn_super_core::types::{Condition, SuperCondition};

/// Resolves condition multisets with one configured policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionResolver {
    policy: ResolutionPolicy,
}

impl ConditionResolver {
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Resolve raw labels. Neither policy depends on label order.
    pub fn resolve<S: AsRef<str>>(&self, labels: &[S]) -> Result<SuperCondition, ResolveError> {
        let conditions = parse_labels(labels)?;
        self.resolve_conditions(&conditions)
    }

    pub fn resolve_conditions(
        &self,
        conditions: &[Condition],
    ) -> Result<SuperCondition, ResolveError> {
        match self.policy {
            ResolutionPolicy::DisagreementAware => disagreement_aware::resolve(conditions),
            ResolutionPolicy::FirstSeenConsensus => first_seen::resolve(conditions),
        }
    }
}

/// Parse every label, failing on the first one outside the vocabulary.
pub fn parse_labels<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Condition>, ResolveError> {
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            Condition::from_label(label).ok_or_else(|| ResolveError::UnrecognizedConditionLabel {
                label: label.to_string(),
            })
        })
        .collect()
}
