//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static INIT: Once = Once::new();

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV_VAR: &str = "PATMERGE_LOG";

/// Initialize the patmerge tracing/logging system.
///
/// Reads `PATMERGE_LOG` for per-crate log levels, e.g.
/// `PATMERGE_LOG=patmerge_engine=debug,patmerge_core=info`.
/// Falls back to the level derived from the configured verbosity.
///
/// This function is idempotent; calling it multiple times is safe.
pub fn init_tracing(config: &ObservabilityConfig) {
    let fallback = config.effective_log_filter();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
