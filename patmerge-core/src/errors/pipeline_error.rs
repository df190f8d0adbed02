//! Pipeline errors: one aggregate over every subsystem.

use super::error_code::ErrorCode;
use super::{BankError, ConfigError, MergeError, OutputError};

/// Errors that can abort a merge run. Aggregates subsystem errors via `From`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Bank error: {0}")]
    Bank(#[from] BankError),

    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Bank(e) => e.error_code(),
            Self::Merge(e) => e.error_code(),
            Self::Output(e) => e.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_forwards_subsystem_code() {
        let err: PipelineError = MergeError::InvalidGroupSize { anchor: 3, size: 5 }.into();
        assert_eq!(err.error_code(), "INVALID_GROUP_SIZE");
        assert!(err.coded_string().starts_with("[INVALID_GROUP_SIZE] Merge error:"));
    }

    #[test]
    fn bank_errors_map_to_specific_codes() {
        let err = BankError::KeyLengthMismatch {
            rank: 0,
            expected: 6,
            actual: 5,
        };
        assert_eq!(err.error_code(), "KEY_LENGTH_MISMATCH");
        let err = BankError::IndexOutOfRange { index: 9, entries: 3 };
        assert_eq!(err.error_code(), "BANK_ERROR");
    }
}
