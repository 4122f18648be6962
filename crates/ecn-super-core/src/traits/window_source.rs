//! WindowSource trait.

use crate::errors::StorageError;
use crate::types::WindowSet;

/// Computes which time spans need (re)analysis.
///
/// An empty span list means there is nothing to process.
pub trait WindowSource {
    fn windows(&self) -> Result<WindowSet, StorageError>;
}
