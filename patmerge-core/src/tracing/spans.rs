//! Span names as constants for programmatic use.
//!
//! The engine opens these spans; log queries and tests match on them.

/// One full merge run: load, ordering, forward pass, consistency check.
pub const MERGE: &str = "patmerge.merge";

/// Pulling patterns out of the source bank.
pub const LOAD: &str = "patmerge.load";

/// The forward pass over anchors.
pub const PASS: &str = "patmerge.pass";
