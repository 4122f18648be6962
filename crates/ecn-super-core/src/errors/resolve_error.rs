//! Condition resolution defects.
//!
//! Both variants are local to one group: the group is skipped and the run
//! continues.

use super::error_code::{self, EcnErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no conditions to resolve")]
    EmptyConditionSet,

    #[error("condition label outside the input vocabulary: {label}")]
    UnrecognizedConditionLabel { label: String },
}

impl EcnErrorCode for ResolveError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyConditionSet => error_code::EMPTY_CONDITION_SET,
            Self::UnrecognizedConditionLabel { .. } => error_code::UNRECOGNIZED_CONDITION,
        }
    }
}
