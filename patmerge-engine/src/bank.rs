//! In-memory pattern bank, readable from a JSON bank file.
//!
//! File layout:
//!
//! ```json
//! {
//!   "info": { "coverage": 0.95, "total_frequency": 1200, "tower": 27, "wrap_constant": 243 },
//!   "entries": [ { "key": [10, 10, 10, 10, 10, 10], "frequency": 5, "value": 0.81, "value_spread": 0.01 } ]
//! }
//! ```

use std::path::Path;

use patmerge_core::errors::BankError;
use patmerge_core::traits::PatternSource;
use patmerge_core::types::{BankInfo, PatternKey};
use serde::{Deserialize, Serialize};

/// One stored bank entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankEntry {
    pub key: PatternKey,
    pub frequency: u32,
    pub value: f32,
    #[serde(default)]
    pub value_spread: f32,
}

impl BankEntry {
    pub fn new(key: PatternKey, frequency: u32, value: f32, value_spread: f32) -> Self {
        Self {
            key,
            frequency,
            value,
            value_spread,
        }
    }
}

/// A whole bank held in memory, entries in native (frequency-sorted) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InMemoryBank {
    pub info: BankInfo,
    pub entries: Vec<BankEntry>,
}

impl InMemoryBank {
    pub fn new(info: BankInfo, entries: Vec<BankEntry>) -> Self {
        Self { info, entries }
    }

    /// Build a bank whose total frequency is the sum over `entries`.
    pub fn from_entries(coverage: f64, wrap_constant: u32, entries: Vec<BankEntry>) -> Self {
        let total_frequency = entries.iter().map(|e| u64::from(e.frequency)).sum();
        Self {
            info: BankInfo {
                coverage,
                total_frequency,
                tower: 0,
                wrap_constant,
            },
            entries,
        }
    }

    /// Parse a bank from JSON. `origin` only labels errors.
    pub fn from_json_str(json: &str, origin: &Path) -> Result<Self, BankError> {
        serde_json::from_str(json).map_err(|e| BankError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read and parse a JSON bank file.
    pub fn from_json_file(path: &Path) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }

    fn entry(&self, index: usize) -> Result<&BankEntry, BankError> {
        self.entries.get(index).ok_or(BankError::IndexOutOfRange {
            index,
            entries: self.entries.len(),
        })
    }
}

impl PatternSource for InMemoryBank {
    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn bank_info(&self) -> BankInfo {
        self.info
    }

    fn pattern_at(&self, index: usize) -> Result<(PatternKey, u32), BankError> {
        let entry = self.entry(index)?;
        Ok((entry.key.clone(), entry.frequency))
    }

    fn attributes_at(&self, index: usize) -> Result<(f32, f32), BankError> {
        let entry = self.entry(index)?;
        Ok((entry.value, entry.value_spread))
    }
}
