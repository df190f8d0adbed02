//! PatternSource trait: the read side of a stored pattern bank.
//!
//! The merge never cares how a bank is stored. Anything that can report its
//! size, its bank-level metadata and the per-entry key/frequency/attributes
//! in native order can be merged.

use crate::errors::BankError;
use crate::types::{BankInfo, PatternKey};

pub trait PatternSource {
    /// Number of entries in the bank.
    fn entry_count(&self) -> usize;

    /// Bank-level coverage, total frequency, tower and wrap constant.
    fn bank_info(&self) -> BankInfo;

    /// Key and frequency of entry `index`.
    fn pattern_at(&self, index: usize) -> Result<(PatternKey, u32), BankError>;

    /// Secondary value and its spread for entry `index`.
    fn attributes_at(&self, index: usize) -> Result<(f32, f32), BankError>;
}
