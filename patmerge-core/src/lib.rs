//! # patmerge-core
//!
//! Foundation crate for the patmerge pattern-bank merger.
//! Defines the pattern types, collaborator traits, errors, config, tracing
//! setup, and defaults. Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod traits;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{MergeConfig, PatmergeConfig};
pub use errors::{BankError, ConfigError, ErrorCode, MergeError, OutputError, PipelineError};
pub use traits::{PatternSource, SiblingObserver};
pub use types::{BankInfo, Pattern, PatternKey, SiblingCandidate};
