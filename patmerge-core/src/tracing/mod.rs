//! Observability for patmerge.
//! `tracing` crate with `EnvFilter`, verbosity-derived default levels.

pub mod setup;
pub mod spans;

pub use setup::init_tracing;
