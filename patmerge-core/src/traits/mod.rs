//! Collaborator traits at the edges of the merge.

pub mod observer;
pub mod pattern_source;

pub use observer::{NoopObserver, SiblingObserver};
pub use pattern_source::PatternSource;
