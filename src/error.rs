//! Errors raised while turning a partition sequence into dendrogram linkage.

use thiserror::Error;

/// Fatal conditions of the linkage transformation. No linkage is emitted once
/// one of these is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HierarchyError {
    /// The sequence is empty, a partition is not a partition of the universe, or
    /// two consecutive partitions are not related by a single split.
    #[error("malformed partition sequence at step {step}: {detail}")]
    MalformedSequence {
        /// Index of the offending partition in the sequence.
        step: usize,
        /// What was violated.
        detail: String,
    },
    /// The registered subsets do not reduce to a single tree rooted at the universe.
    #[error("hierarchy does not converge to one root: {detail}")]
    DisconnectedHierarchy {
        /// Which tree property failed.
        detail: String,
    },
    /// No registered subset has the size of a node that needs a height.
    #[error("no registered subsets of size {size} to rank against")]
    DegenerateRankGroup {
        /// Subtree size that had no rank group.
        size: usize,
    },
}

impl HierarchyError {
    pub(crate) fn malformed(step: usize, detail: impl Into<String>) -> Self {
        Self::MalformedSequence { step, detail: detail.into() }
    }

    pub(crate) fn disconnected(detail: impl Into<String>) -> Self {
        Self::DisconnectedHierarchy { detail: detail.into() }
    }
}
