//! Pattern records and the bank-level metadata they are loaded with.

use serde::{Deserialize, Serialize};

use super::key::PatternKey;

/// A single bank entry after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub key: PatternKey,
    /// Number of training tracks that produced this pattern.
    pub frequency: u32,
    /// Secondary scalar (mean track phi) used for the windowed search.
    pub value: f32,
    /// Spread of `value`. Carried for output, never used by the merge.
    pub value_spread: f32,
    /// Position in the source's load order (frequency-sorted in practice).
    pub original_rank: usize,
    /// Position in the value-sorted order; `None` until the order is built.
    pub value_position: Option<usize>,
}

impl Pattern {
    pub fn new(key: PatternKey, frequency: u32, value: f32, value_spread: f32, original_rank: usize) -> Self {
        Self {
            key,
            frequency,
            value,
            value_spread,
            original_rank,
            value_position: None,
        }
    }
}

/// Bank-level metadata reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankInfo {
    /// Coverage of the full bank (fraction of training tracks matched).
    pub coverage: f64,
    /// Sum of all pattern frequencies in the full bank.
    pub total_frequency: u64,
    /// Trigger tower the bank was generated for.
    pub tower: u32,
    /// Bin distance that counts as adjacent across a cyclic boundary.
    pub wrap_constant: u32,
}

/// An unconsumed pattern that differs from an anchor in exactly one layer by
/// an adjacent offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiblingCandidate {
    pub anchor_rank: usize,
    pub candidate_rank: usize,
    /// Index of the differing coordinate.
    pub layer: usize,
    /// `candidate[layer] - anchor[layer]`.
    pub delta: i32,
}
