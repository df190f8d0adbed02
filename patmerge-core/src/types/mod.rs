//! Pattern data model and collection aliases.

pub mod collections;
pub mod key;
pub mod pattern;

pub use collections::{FxHashMap, FxHashSet};
pub use key::PatternKey;
pub use pattern::{BankInfo, Pattern, SiblingCandidate};
