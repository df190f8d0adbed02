//! ErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to provide a structured code string that
/// the CLI prints and scripts can match on.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "KEY_LENGTH_MISMATCH").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

// Error code constants.
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const BANK_ERROR: &str = "BANK_ERROR";
pub const KEY_LENGTH_MISMATCH: &str = "KEY_LENGTH_MISMATCH";
pub const RANK_MISMATCH: &str = "RANK_MISMATCH";
pub const COVERAGE_NOT_REACHED: &str = "COVERAGE_NOT_REACHED";
pub const INVALID_GROUP_SIZE: &str = "INVALID_GROUP_SIZE";
pub const DUPLICATE_PLACEMENT: &str = "DUPLICATE_PLACEMENT";
pub const MERGE_ERROR: &str = "MERGE_ERROR";
pub const OUTPUT_ERROR: &str = "OUTPUT_ERROR";
