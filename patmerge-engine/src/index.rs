//! PatternIndex: exact key → original rank.

use patmerge_core::types::{FxHashMap, Pattern, PatternKey};
use tracing::warn;

/// O(1) identity lookup for hypothetical combined keys.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
    by_key: FxHashMap<PatternKey, usize>,
}

impl PatternIndex {
    /// Index every pattern by its key. If a key repeats, the first
    /// (higher-ranked) entry keeps the slot.
    pub fn build(patterns: &[Pattern]) -> Self {
        let mut by_key = FxHashMap::default();
        by_key.reserve(patterns.len());
        for pattern in patterns {
            if let Some(&kept) = by_key.get(&pattern.key) {
                warn!(
                    key = %pattern.key,
                    kept,
                    duplicate = pattern.original_rank,
                    "duplicate key in bank"
                );
                continue;
            }
            by_key.insert(pattern.key.clone(), pattern.original_rank);
        }
        Self { by_key }
    }

    pub fn rank_of(&self, key: &PatternKey) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}
