//! Errors raised while reading and loading a pattern bank.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur while pulling patterns out of a source bank.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("IO error reading bank {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Bank parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Pattern index {index} out of range (bank holds {entries} entries)")]
    IndexOutOfRange { index: usize, entries: usize },

    #[error("Pattern {rank} has {actual} layers, expected {expected}")]
    KeyLengthMismatch {
        rank: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Loaded list holds {loaded} patterns while loading rank {rank}")]
    RankMismatch { rank: usize, loaded: usize },

    #[error(
        "Target coverage {target:.4} not reached: got {reached:.4} from a bank with coverage {bank_coverage:.4}"
    )]
    CoverageNotReached {
        target: f64,
        reached: f64,
        bank_coverage: f64,
    },
}

impl ErrorCode for BankError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::KeyLengthMismatch { .. } => error_code::KEY_LENGTH_MISMATCH,
            Self::RankMismatch { .. } => error_code::RANK_MISMATCH,
            Self::CoverageNotReached { .. } => error_code::COVERAGE_NOT_REACHED,
            _ => error_code::BANK_ERROR,
        }
    }
}
