//! Error handling for patmerge.
//! One error enum per subsystem, `thiserror` only.

pub mod bank_error;
pub mod config_error;
pub mod error_code;
pub mod merge_error;
pub mod output_error;
pub mod pipeline_error;

pub use bank_error::BankError;
pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use merge_error::MergeError;
pub use output_error::OutputError;
pub use pipeline_error::PipelineError;
