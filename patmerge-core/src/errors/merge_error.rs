//! Structural invariant violations detected during the merge pass.

use super::error_code::{self, ErrorCode};

/// Fatal merge-pass errors. Absent partners or consumed candidates are
/// normal control flow and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Group anchored at rank {anchor} has size {size}, expected 1, 2, 4 or 8")]
    InvalidGroupSize { anchor: usize, size: usize },

    #[error("Duplicate placement: {distinct} distinct ranks across {placed} placements")]
    DuplicatePlacement { distinct: usize, placed: usize },

    #[error("Rank {rank} out of range for {total} loaded patterns")]
    RankOutOfRange { rank: usize, total: usize },

    #[error("Value order requested before it was built")]
    ValueOrderNotBuilt,
}

impl ErrorCode for MergeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidGroupSize { .. } => error_code::INVALID_GROUP_SIZE,
            Self::DuplicatePlacement { .. } => error_code::DUPLICATE_PLACEMENT,
            _ => error_code::MERGE_ERROR,
        }
    }
}
