use std::collections::TryReserveError;

/// Errors that can occur when working with a [DisjointSet](crate::disjoint_set::DisjointSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisjointSetError {
    /// The parent/rank storage could not be reserved.
    #[error("Failed to allocate disjoint set storage")]
    AllocationFailure(#[from] TryReserveError),

    /// The set id was never issued by this structure.
    #[error("Set id {0} does not exist")]
    InvalidSetId(usize),
}

/// Errors that can occur when labelling sparse regions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    /// Heap exhaustion while growing the disjoint set or a scratch buffer.
    #[error("Failed to allocate memory")]
    AllocationFailure(#[from] TryReserveError),

    /// Two neighbour regions could not be merged. Unreachable for valid input.
    #[error("Illegal merge of neighbour regions at position {position}")]
    InvalidMerge {
        /// Scan position being processed.
        position: usize,
        /// Error reported by the disjoint set.
        #[source]
        source: DisjointSetError,
    },

    /// A provisional region id read back from the label buffer was never issued.
    #[error("Unknown region id {id} at position {position}")]
    UnknownRegion {
        /// Scan position being processed.
        position: usize,
        /// The offending id.
        id: u64,
    },

    /// The disjoint set issued or was given an id outside its range.
    #[error("Disjoint set id {0} does not exist")]
    InvalidSetId(usize),

    /// A neighbour offset does not look backward.
    #[error("Delta {delta} at position {position} must be negative")]
    InvalidDelta {
        /// Position of the offending delta.
        position: usize,
        /// The offending delta.
        delta: i64,
    },

    /// The foreground indices are not strictly ascending.
    #[error("Indices are not strictly ascending at position {position}")]
    UnsortedIndices {
        /// First position whose index is not greater than its predecessor.
        position: usize,
    },

    /// The label buffer does not match the number of indices.
    #[error("Labels length ({0}) does not match the indices length ({1})")]
    LengthMismatch(usize, usize),

    /// The grid shape cannot produce neighbour offsets.
    #[error("Invalid grid shape {0:?}")]
    InvalidShape(Vec<usize>),
}

impl From<DisjointSetError> for LabelError {
    fn from(err: DisjointSetError) -> Self {
        match err {
            DisjointSetError::AllocationFailure(e) => LabelError::AllocationFailure(e),
            DisjointSetError::InvalidSetId(id) => LabelError::InvalidSetId(id),
        }
    }
}
