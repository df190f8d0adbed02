//! MergeRegistry: rank ↔ group bookkeeping and the post-pass consistency check.
//!
//! `record_group` is the only place consumed flags are written. Search and
//! selection only ever see `&ConsumedFlags`.

use patmerge_core::errors::MergeError;
use patmerge_core::types::FxHashSet;
use serde::Serialize;

/// Index into `MergeRegistry::groups`.
pub type GroupId = usize;

/// One flag per original rank, set when the rank joins a group.
#[derive(Debug, Clone, Default)]
pub struct ConsumedFlags(Vec<bool>);

impl ConsumedFlags {
    fn new(total: usize) -> Self {
        Self(vec![false; total])
    }

    /// Out-of-range ranks read as consumed so they are never offered.
    pub fn is_consumed(&self, rank: usize) -> bool {
        self.0.get(rank).copied().unwrap_or(true)
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&c| c).count()
    }

    fn mark(&mut self, rank: usize) {
        self.0[rank] = true;
    }
}

/// Result of the consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Distinct ranks found across all groups.
    pub distinct_placed: usize,
    /// Total member slots across all groups.
    pub placements: usize,
    /// Patterns the pass could have placed.
    pub total_considered: usize,
    pub groups: usize,
}

impl ConsistencyReport {
    /// Every considered rank ended up in exactly one group.
    pub fn is_complete(&self) -> bool {
        self.distinct_placed == self.total_considered
    }
}

#[derive(Debug, Clone)]
pub struct MergeRegistry {
    group_of: Vec<Option<GroupId>>,
    groups: Vec<Vec<usize>>,
    consumed: ConsumedFlags,
}

impl MergeRegistry {
    pub fn new(total: usize) -> Self {
        Self {
            group_of: vec![None; total],
            groups: Vec::new(),
            consumed: ConsumedFlags::new(total),
        }
    }

    /// Append `[anchor] ++ absorbed` as a new group and mark every member consumed.
    pub fn record_group(&mut self, anchor: usize, absorbed: &[usize]) -> Result<GroupId, MergeError> {
        let size = absorbed.len() + 1;
        if !matches!(size, 1 | 2 | 4 | 8) {
            return Err(MergeError::InvalidGroupSize { anchor, size });
        }
        let total = self.group_of.len();
        if let Some(&rank) = std::iter::once(&anchor)
            .chain(absorbed)
            .find(|&&r| r >= total)
        {
            return Err(MergeError::RankOutOfRange { rank, total });
        }

        let id = self.groups.len();
        let mut members = Vec::with_capacity(size);
        members.push(anchor);
        members.extend_from_slice(absorbed);
        for &rank in &members {
            self.group_of[rank] = Some(id);
            self.consumed.mark(rank);
        }
        self.groups.push(members);
        Ok(id)
    }

    /// Fail on any rank placed twice; otherwise report how much was placed.
    pub fn check_consistency(&self) -> Result<ConsistencyReport, MergeError> {
        let mut distinct = FxHashSet::default();
        let mut placements = 0usize;
        for &rank in self.groups.iter().flatten() {
            distinct.insert(rank);
            placements += 1;
        }
        if distinct.len() != placements {
            return Err(MergeError::DuplicatePlacement {
                distinct: distinct.len(),
                placed: placements,
            });
        }
        Ok(ConsistencyReport {
            distinct_placed: distinct.len(),
            placements,
            total_considered: self.group_of.len(),
            groups: self.groups.len(),
        })
    }

    /// `(total - groups) / total`; 0 for an empty bank.
    pub fn compression_gain(&self) -> f64 {
        let total = self.group_of.len();
        if total == 0 {
            return 0.0;
        }
        total.saturating_sub(self.groups.len()) as f64 / total as f64
    }

    pub fn consumed(&self) -> &ConsumedFlags {
        &self.consumed
    }

    pub fn group_of(&self) -> &[Option<GroupId>] {
        &self.group_of
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn into_parts(self) -> (Vec<Option<GroupId>>, Vec<Vec<usize>>) {
        (self.group_of, self.groups)
    }
}
