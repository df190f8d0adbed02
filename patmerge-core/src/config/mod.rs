//! Configuration system for patmerge.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod defaults;
pub mod merge_config;
pub mod observability_config;
pub mod patmerge_config;

pub use merge_config::MergeConfig;
pub use observability_config::ObservabilityConfig;
pub use patmerge_config::{CliOverrides, PatmergeConfig};
