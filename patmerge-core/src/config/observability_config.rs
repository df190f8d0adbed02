//! Observability configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Logging volume. Verbosity only changes what gets logged, never the result.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// 0 = warnings only, 1 = progress, 10 = per-anchor detail, 100 = per-pattern dump.
    pub verbosity: Option<u32>,
    /// Explicit `EnvFilter` directive; overrides the level derived from verbosity.
    pub log_filter: Option<String>,
}

impl ObservabilityConfig {
    pub fn effective_verbosity(&self) -> u32 {
        self.verbosity.unwrap_or(defaults::DEFAULT_VERBOSITY)
    }

    /// Filter directive used when `PATMERGE_LOG` is not set.
    pub fn effective_log_filter(&self) -> String {
        if let Some(ref filter) = self.log_filter {
            return filter.clone();
        }
        let level = match self.effective_verbosity() {
            0 => "warn",
            1..=9 => "info",
            10..=99 => "debug",
            _ => "trace",
        };
        format!("patmerge={level},patmerge_core={level},patmerge_engine={level}")
    }
}
