//! Merge-pass configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Configuration for loading and merging a pattern bank.
///
/// Every field is optional so file, environment and CLI layers can be merged;
/// the `effective_*` accessors resolve to compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Number of layers (coordinates) in every pattern key.
    pub n_layers: Option<usize>,
    /// Half-width of the value-ordered search window. 0 = unrestricted.
    pub window_half_width: Option<usize>,
    /// Stop loading once running coverage reaches this fraction.
    pub target_coverage: Option<f64>,
    /// Maximum number of patterns to load. 0 = unrestricted.
    pub max_patterns_to_load: Option<usize>,
    /// Number of patterns to process as anchors. 0 = all loaded.
    pub max_trials_to_process: Option<usize>,
    /// Adjacency distance across the cyclic boundary. Defaults to the bank's value.
    pub wrap_constant: Option<u32>,
    /// Log a progress line every N anchors.
    pub progress_interval: Option<usize>,
    /// Fill the diagnostic histograms during the pass.
    pub record_diagnostics: Option<bool>,
}

impl MergeConfig {
    pub fn effective_n_layers(&self) -> usize {
        self.n_layers.unwrap_or(defaults::DEFAULT_N_LAYERS)
    }

    pub fn effective_window_half_width(&self) -> usize {
        self.window_half_width
            .unwrap_or(defaults::DEFAULT_WINDOW_HALF_WIDTH)
    }

    pub fn effective_target_coverage(&self) -> f64 {
        self.target_coverage
            .unwrap_or(defaults::DEFAULT_TARGET_COVERAGE)
    }

    pub fn effective_max_patterns_to_load(&self) -> usize {
        self.max_patterns_to_load
            .unwrap_or(defaults::DEFAULT_MAX_PATTERNS_TO_LOAD)
    }

    pub fn effective_max_trials_to_process(&self) -> usize {
        self.max_trials_to_process
            .unwrap_or(defaults::DEFAULT_MAX_TRIALS_TO_PROCESS)
    }

    /// Configured wrap constant, falling back to the one the bank reports.
    pub fn effective_wrap_constant(&self, bank_wrap_constant: u32) -> u32 {
        self.wrap_constant.unwrap_or(bank_wrap_constant)
    }

    /// Reject wrap constants whose deltas do not fit a sibling's `i32` delta.
    pub fn check_wrap_constant(wrap_constant: u32) -> Result<(), ConfigError> {
        if wrap_constant > defaults::MAX_WRAP_CONSTANT {
            return Err(ConfigError::ValidationFailed {
                field: "merge.wrap_constant".to_string(),
                message: format!(
                    "must be at most {}, got {wrap_constant}",
                    defaults::MAX_WRAP_CONSTANT
                ),
            });
        }
        Ok(())
    }

    pub fn effective_progress_interval(&self) -> usize {
        self.progress_interval
            .unwrap_or(defaults::DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn effective_record_diagnostics(&self) -> bool {
        self.record_diagnostics
            .unwrap_or(defaults::DEFAULT_RECORD_DIAGNOSTICS)
    }
}
