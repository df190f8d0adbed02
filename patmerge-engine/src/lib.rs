//! # patmerge-engine
//!
//! Single-pass merge of a pattern bank:
//! load → value order → windowed sibling search → 8/4/2-way selection →
//! registry bookkeeping → consistency check.
//!
//! The source bank and the output format sit behind [`PatternSource`] and
//! [`MergeSink`]; everything between them is deterministic and single-threaded.
//!
//! [`PatternSource`]: patmerge_core::PatternSource

pub mod bank;
pub mod diagnostics;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod selector;
pub mod siblings;
pub mod store;

pub use bank::{BankEntry, InMemoryBank};
pub use diagnostics::{DiagnosticsReport, Histogram, MergeDiagnostics};
pub use index::PatternIndex;
pub use output::{JsonFileSink, MemorySink, MergeSink};
pub use pipeline::{MergeOutcome, MergePipeline, MergeSummary};
pub use registry::{ConsistencyReport, ConsumedFlags, GroupId, MergeRegistry};
pub use selector::{MergeLevel, Selection, SiblingSelector};
pub use siblings::SiblingFinder;
pub use store::PatternStore;
