//! Merge errors.

use plainmerge_classifier::{KeyPath, ValueKind};

/// Misuse of the merge operation.
///
/// On error the target may already hold the keys processed before the
/// failing one.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MergeError {
    /// Nesting went deeper than the configured bound.
    #[error("merge depth limit of {limit} exceeded at {path}")]
    DepthLimitExceeded { path: KeyPath, limit: usize },

    /// A plain source record met a target slot that cannot hold keys.
    ///
    /// This covers array and class-instance slots too. A dynamic host would
    /// set the source keys as properties on those objects instead; here the
    /// merge stops and the target keeps the slot unchanged.
    #[error("cannot merge a plain object into {found:?} target at {path}")]
    IncompatibleTarget { path: KeyPath, found: ValueKind },
}

impl MergeError {
    /// Where in the target the merge stopped.
    pub fn path(&self) -> &KeyPath {
        match self {
            MergeError::DepthLimitExceeded { path, .. } => path,
            MergeError::IncompatibleTarget { path, .. } => path,
        }
    }
}
