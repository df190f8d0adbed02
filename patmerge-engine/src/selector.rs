//! SiblingSelector: picks the merge group for one anchor.
//!
//! Levels are tried in strict priority order and the first level with any
//! valid candidate wins; frequencies are only compared within a level.
//!
//! - **8-way**: three siblings on three distinct layers span a 2×2×2 cube
//!   with the anchor. The four corners not yet visited (all three offsets
//!   applied, and each of the three "two offsets applied" corners) must all
//!   exist in the bank and be unconsumed.
//! - **4-way**: two siblings on distinct layers; the corner with both
//!   offsets applied must exist and be unconsumed.
//! - **2-way**: the most frequent sibling.
//!
//! Within a level the candidate with the largest summed frequency wins;
//! ties keep the first one in enumeration order. The selector never writes
//! consumed state.

use patmerge_core::errors::MergeError;
use patmerge_core::types::collections::SmallVec7;
use patmerge_core::types::{PatternKey, SiblingCandidate};
use serde::Serialize;

use crate::index::PatternIndex;
use crate::registry::ConsumedFlags;
use crate::store::PatternStore;

/// Size class of a merge group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MergeLevel {
    Single,
    Pair,
    Quad,
    Octet,
}

impl MergeLevel {
    /// Members in the group, anchor included.
    pub fn group_size(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
            Self::Quad => 4,
            Self::Octet => 8,
        }
    }
}

/// Ranks to absorb into the anchor's group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub level: MergeLevel,
    /// Siblings first, then resolved corners. Length is `group_size() - 1`.
    pub absorbed: SmallVec7<usize>,
    /// Summed frequency of the absorbed ranks.
    pub absorbed_frequency: u64,
}

impl Selection {
    fn single() -> Self {
        Self {
            level: MergeLevel::Single,
            absorbed: SmallVec7::new(),
            absorbed_frequency: 0,
        }
    }
}

pub struct SiblingSelector<'a> {
    store: &'a PatternStore,
    index: &'a PatternIndex,
}

impl<'a> SiblingSelector<'a> {
    pub fn new(store: &'a PatternStore, index: &'a PatternIndex) -> Self {
        Self { store, index }
    }

    /// Choose the group for `anchor_rank` from its sibling list.
    pub fn select(
        &self,
        anchor_rank: usize,
        siblings: &[SiblingCandidate],
        consumed: &ConsumedFlags,
    ) -> Result<Selection, MergeError> {
        if siblings.is_empty() {
            return Ok(Selection::single());
        }
        let anchor_key = &self.store.pattern(anchor_rank)?.key;

        if let Some(selection) = self.try_octet(anchor_rank, anchor_key, siblings, consumed) {
            return Ok(selection);
        }
        if let Some(selection) = self.try_quad(anchor_rank, anchor_key, siblings, consumed) {
            return Ok(selection);
        }
        Ok(self.best_pair(siblings))
    }

    fn try_octet(
        &self,
        anchor_rank: usize,
        anchor_key: &PatternKey,
        siblings: &[SiblingCandidate],
        consumed: &ConsumedFlags,
    ) -> Option<Selection> {
        let mut best: Option<Selection> = None;
        let n = siblings.len();

        for i in 0..n {
            for j in (i + 1)..n {
                if siblings[i].layer == siblings[j].layer {
                    continue;
                }
                for k in (j + 1)..n {
                    if siblings[k].layer == siblings[i].layer
                        || siblings[k].layer == siblings[j].layer
                    {
                        continue;
                    }
                    let triple = [&siblings[i], &siblings[j], &siblings[k]];
                    let Some(corners) = self.resolve_cube(anchor_rank, anchor_key, triple, consumed)
                    else {
                        continue;
                    };

                    let total: u64 = triple
                        .iter()
                        .map(|s| s.candidate_rank)
                        .chain(corners)
                        .map(|rank| self.frequency(rank))
                        .sum();
                    if best.as_ref().map_or(true, |b| total > b.absorbed_frequency) {
                        let mut absorbed: SmallVec7<usize> =
                            triple.iter().map(|s| s.candidate_rank).collect();
                        absorbed.extend(corners);
                        best = Some(Selection {
                            level: MergeLevel::Octet,
                            absorbed,
                            absorbed_frequency: total,
                        });
                    }
                }
            }
        }
        best
    }

    /// Resolve the four unvisited cube corners of a triple, or `None` if any
    /// is missing or unavailable.
    fn resolve_cube(
        &self,
        anchor_rank: usize,
        anchor_key: &PatternKey,
        triple: [&SiblingCandidate; 3],
        consumed: &ConsumedFlags,
    ) -> Option<[usize; 4]> {
        let mut full = anchor_key.clone();
        for sibling in triple {
            full.shift_in_place(sibling.layer, sibling.delta)?;
        }

        let mut corners = [0usize; 4];
        corners[0] = self.available(&full, anchor_rank, consumed)?;
        for (slot, sibling) in corners[1..].iter_mut().zip(triple) {
            let reverted = full.shifted(sibling.layer, sibling.delta.checked_neg()?)?;
            *slot = self.available(&reverted, anchor_rank, consumed)?;
        }
        Some(corners)
    }

    fn try_quad(
        &self,
        anchor_rank: usize,
        anchor_key: &PatternKey,
        siblings: &[SiblingCandidate],
        consumed: &ConsumedFlags,
    ) -> Option<Selection> {
        let mut best: Option<Selection> = None;
        let n = siblings.len();

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&siblings[i], &siblings[j]);
                if a.layer == b.layer {
                    continue;
                }
                let Some(combined) = anchor_key
                    .shifted(a.layer, a.delta)
                    .and_then(|key| key.shifted(b.layer, b.delta))
                else {
                    continue;
                };
                let Some(corner) = self.available(&combined, anchor_rank, consumed) else {
                    continue;
                };

                let total = self.frequency(a.candidate_rank)
                    + self.frequency(b.candidate_rank)
                    + self.frequency(corner);
                if best.as_ref().map_or(true, |best| total > best.absorbed_frequency) {
                    best = Some(Selection {
                        level: MergeLevel::Quad,
                        absorbed: [a.candidate_rank, b.candidate_rank, corner]
                            .into_iter()
                            .collect(),
                        absorbed_frequency: total,
                    });
                }
            }
        }
        best
    }

    fn best_pair(&self, siblings: &[SiblingCandidate]) -> Selection {
        let mut best = Selection::single();
        for sibling in siblings {
            let frequency = self.frequency(sibling.candidate_rank);
            if best.absorbed.is_empty() || frequency > best.absorbed_frequency {
                best = Selection {
                    level: MergeLevel::Pair,
                    absorbed: std::iter::once(sibling.candidate_rank).collect(),
                    absorbed_frequency: frequency,
                };
            }
        }
        best
    }

    /// Rank of `key` if it exists, is not the anchor and is not consumed.
    fn available(&self, key: &PatternKey, anchor_rank: usize, consumed: &ConsumedFlags) -> Option<usize> {
        self.index
            .rank_of(key)
            .filter(|&rank| rank != anchor_rank && !consumed.is_consumed(rank))
    }

    fn frequency(&self, rank: usize) -> u64 {
        self.store
            .patterns()
            .get(rank)
            .map_or(0, |p| u64::from(p.frequency))
    }
}
