// Single source of truth for all default values.

// --- Merge ---
pub const DEFAULT_N_LAYERS: usize = 6;
pub const DEFAULT_WINDOW_HALF_WIDTH: usize = 0; // 0 = search the whole bank
pub const DEFAULT_TARGET_COVERAGE: f64 = 0.95;
pub const DEFAULT_MAX_PATTERNS_TO_LOAD: usize = 0; // 0 = unrestricted
pub const DEFAULT_MAX_TRIALS_TO_PROCESS: usize = 0; // 0 = every loaded pattern
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1_000;
pub const DEFAULT_RECORD_DIAGNOSTICS: bool = true;
pub const MAX_N_LAYERS: usize = 32;
/// Sibling deltas are stored as `i32`.
pub const MAX_WRAP_CONSTANT: u32 = i32::MAX as u32;

// --- Load ---
pub const LOAD_PROGRESS_INTERVAL: usize = 1_000_000;

// --- Observability ---
pub const DEFAULT_VERBOSITY: u32 = 1;

// --- Files ---
pub const PROJECT_CONFIG_FILENAME: &str = "patmerge.toml";
pub const USER_CONFIG_DIRNAME: &str = ".patmerge";
