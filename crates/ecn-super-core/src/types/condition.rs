//! The closed condition vocabulary.
//!
//! Input labels live under `ecn.connectivity.*`, output labels under
//! `ecn.connectivity.super.*`. Labels are matched exactly; anything else is
//! outside the vocabulary.

use std::fmt;

/// One observed connectivity behavior, as carried by raw observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    /// Connections with and without ECN both succeeded.
    Works,
    /// Connections without ECN succeeded, connections with ECN failed.
    Broken,
    /// Connections with ECN succeeded, connections without ECN failed.
    Transient,
    /// Neither succeeded.
    Offline,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::Works,
        Condition::Broken,
        Condition::Transient,
        Condition::Offline,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Works => "ecn.connectivity.works",
            Self::Broken => "ecn.connectivity.broken",
            Self::Transient => "ecn.connectivity.transient",
            Self::Offline => "ecn.connectivity.offline",
        }
    }

    /// Parse an exact input label. Returns `None` for anything outside the
    /// input vocabulary, including super labels.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn is_input_label(label: &str) -> bool {
        Self::from_label(label).is_some()
    }

    /// All input labels, in vocabulary order.
    pub fn labels() -> [&'static str; 4] {
        Self::ALL.map(Self::label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary of a group's overall behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuperCondition {
    Works,
    Broken,
    Transient,
    Offline,
    /// Observations disagree in a way no other label explains.
    Weird,
}

impl SuperCondition {
    pub const ALL: [SuperCondition; 5] = [
        SuperCondition::Works,
        SuperCondition::Broken,
        SuperCondition::Transient,
        SuperCondition::Offline,
        SuperCondition::Weird,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Works => "ecn.connectivity.super.works",
            Self::Broken => "ecn.connectivity.super.broken",
            Self::Transient => "ecn.connectivity.super.transient",
            Self::Offline => "ecn.connectivity.super.offline",
            Self::Weird => "ecn.connectivity.super.weird",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl From<Condition> for SuperCondition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Works => Self::Works,
            Condition::Broken => Self::Broken,
            Condition::Transient => Self::Transient,
            Condition::Offline => Self::Offline,
        }
    }
}

impl fmt::Display for SuperCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
