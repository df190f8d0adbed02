//! SiblingFinder: windowed search for single-coordinate neighbours.
//!
//! Patterns are visited in value order inside a window centred on the anchor.
//! A neighbour qualifies when it differs from the anchor in exactly one layer
//! by 1 bin, or by the wrap constant (adjacent across the cyclic boundary).

use patmerge_core::errors::MergeError;
use patmerge_core::traits::SiblingObserver;
use patmerge_core::types::SiblingCandidate;

use crate::registry::ConsumedFlags;
use crate::store::PatternStore;

pub struct SiblingFinder<'a> {
    store: &'a PatternStore,
    window_half_width: usize,
    wrap_constant: u32,
}

impl<'a> SiblingFinder<'a> {
    /// `window_half_width == 0` searches the whole value order.
    pub fn new(store: &'a PatternStore, window_half_width: usize, wrap_constant: u32) -> Self {
        Self {
            store,
            window_half_width,
            wrap_constant,
        }
    }

    /// Unconsumed siblings of `anchor_rank`, in value order.
    ///
    /// Every single-layer difference is reported to `observer` before the
    /// adjacency test; the accepted list is reported once at the end.
    pub fn find<O: SiblingObserver + ?Sized>(
        &self,
        anchor_rank: usize,
        consumed: &ConsumedFlags,
        observer: &mut O,
    ) -> Result<Vec<SiblingCandidate>, MergeError> {
        let anchor = self.store.pattern(anchor_rank)?;
        let centre = self.store.value_position(anchor_rank)?;
        let window = self.store.window(anchor_rank, self.window_half_width)?;
        let patterns = self.store.patterns();

        let mut siblings = Vec::new();
        for position in window {
            if position == centre {
                continue;
            }
            let rank = self.store.rank_at(position)?;
            if consumed.is_consumed(rank) {
                continue;
            }

            let candidate = &patterns[rank];
            let Some((layer, delta)) = anchor.key.single_difference(&candidate.key) else {
                continue;
            };

            observer.single_layer_difference(
                layer,
                delta,
                anchor.frequency,
                position as i64 - centre as i64,
                candidate.value - anchor.value,
            );

            if !self.is_adjacent(delta) {
                continue;
            }
            // Adjacent deltas are 1 or the wrap constant, which the pipeline
            // bounds to `i32`.
            let Ok(delta) = i32::try_from(delta) else {
                continue;
            };
            siblings.push(SiblingCandidate {
                anchor_rank,
                candidate_rank: rank,
                layer,
                delta,
            });
        }

        observer.siblings_found(&siblings);
        Ok(siblings)
    }

    fn is_adjacent(&self, delta: i64) -> bool {
        let magnitude = delta.unsigned_abs();
        magnitude == 1 || magnitude == u64::from(self.wrap_constant)
    }
}
