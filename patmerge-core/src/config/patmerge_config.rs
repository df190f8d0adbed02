//! Top-level patmerge configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{defaults, MergeConfig, ObservabilityConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PATMERGE_*`)
/// 3. Project config (`patmerge.toml` in the given root)
/// 4. User config (`~/.patmerge/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PatmergeConfig {
    pub merge: MergeConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub window_half_width: Option<usize>,
    pub target_coverage: Option<f64>,
    pub max_patterns_to_load: Option<usize>,
    pub max_trials_to_process: Option<usize>,
    pub n_layers: Option<usize>,
    pub wrap_constant: Option<u32>,
    pub verbosity: Option<u32>,
}

impl PatmergeConfig {
    /// Load configuration with 4-layer resolution, then validate it.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(defaults::PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &PatmergeConfig) -> Result<(), ConfigError> {
        let coverage = config.merge.effective_target_coverage();
        if !(coverage > 0.0 && coverage <= 1.0) {
            return Err(ConfigError::ValidationFailed {
                field: "merge.target_coverage".to_string(),
                message: format!("must be in (0.0, 1.0], got {coverage}"),
            });
        }
        let n_layers = config.merge.effective_n_layers();
        if n_layers == 0 || n_layers > defaults::MAX_N_LAYERS {
            return Err(ConfigError::ValidationFailed {
                field: "merge.n_layers".to_string(),
                message: format!("must be between 1 and {}", defaults::MAX_N_LAYERS),
            });
        }
        if config.merge.effective_progress_interval() == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "merge.progress_interval".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(wrap_constant) = config.merge.wrap_constant {
            MergeConfig::check_wrap_constant(wrap_constant)?;
        }
        Ok(())
    }

    /// Returns the user config path: `~/.patmerge/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(defaults::USER_CONFIG_DIRNAME).join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut PatmergeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PatmergeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        ::tracing::debug!(path = %path.display(), "merged config file");
        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a `Some` value.
    fn merge(base: &mut PatmergeConfig, other: &PatmergeConfig) {
        let (b, o) = (&mut base.merge, &other.merge);
        if o.n_layers.is_some() {
            b.n_layers = o.n_layers;
        }
        if o.window_half_width.is_some() {
            b.window_half_width = o.window_half_width;
        }
        if o.target_coverage.is_some() {
            b.target_coverage = o.target_coverage;
        }
        if o.max_patterns_to_load.is_some() {
            b.max_patterns_to_load = o.max_patterns_to_load;
        }
        if o.max_trials_to_process.is_some() {
            b.max_trials_to_process = o.max_trials_to_process;
        }
        if o.wrap_constant.is_some() {
            b.wrap_constant = o.wrap_constant;
        }
        if o.progress_interval.is_some() {
            b.progress_interval = o.progress_interval;
        }
        if o.record_diagnostics.is_some() {
            b.record_diagnostics = o.record_diagnostics;
        }

        if other.observability.verbosity.is_some() {
            base.observability.verbosity = other.observability.verbosity;
        }
        if other.observability.log_filter.is_some() {
            base.observability.log_filter = other.observability.log_filter.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PATMERGE_WINDOW_HALF_WIDTH`, `PATMERGE_TARGET_COVERAGE`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut PatmergeConfig) {
        if let Some(v) = env_parse::<usize>("PATMERGE_WINDOW_HALF_WIDTH") {
            config.merge.window_half_width = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PATMERGE_TARGET_COVERAGE") {
            config.merge.target_coverage = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PATMERGE_MAX_PATTERNS") {
            config.merge.max_patterns_to_load = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PATMERGE_MAX_TRIALS") {
            config.merge.max_trials_to_process = Some(v);
        }
        if let Some(v) = env_parse::<usize>("PATMERGE_N_LAYERS") {
            config.merge.n_layers = Some(v);
        }
        if let Some(v) = env_parse::<u32>("PATMERGE_WRAP_CONSTANT") {
            config.merge.wrap_constant = Some(v);
        }
        if let Some(v) = env_parse::<u32>("PATMERGE_VERBOSITY") {
            config.observability.verbosity = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PatmergeConfig, cli: &CliOverrides) {
        if let Some(v) = cli.window_half_width {
            config.merge.window_half_width = Some(v);
        }
        if let Some(v) = cli.target_coverage {
            config.merge.target_coverage = Some(v);
        }
        if let Some(v) = cli.max_patterns_to_load {
            config.merge.max_patterns_to_load = Some(v);
        }
        if let Some(v) = cli.max_trials_to_process {
            config.merge.max_trials_to_process = Some(v);
        }
        if let Some(v) = cli.n_layers {
            config.merge.n_layers = Some(v);
        }
        if let Some(v) = cli.wrap_constant {
            config.merge.wrap_constant = Some(v);
        }
        if let Some(v) = cli.verbosity {
            config.observability.verbosity = Some(v);
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
