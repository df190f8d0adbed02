//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for pattern keys (banks usually carry 6 layers, never more than 8 inline).
pub type SmallVec8<T> = SmallVec<[T; 8]>;

/// SmallVec sized for a merge selection (at most 7 absorbed ranks).
pub type SmallVec7<T> = SmallVec<[T; 7]>;
