//! SiblingObserver trait: where the sibling search reports its diagnostics.
//!
//! Observers never influence the search. The default methods do nothing, so
//! [`NoopObserver`] is the zero-cost choice when histograms are not wanted.

use crate::types::SiblingCandidate;

pub trait SiblingObserver {
    /// A window entry differing from the anchor in exactly one layer, before
    /// the adjacency test. `window_offset` is candidate minus anchor position
    /// in value order; `value_difference` is candidate minus anchor value.
    fn single_layer_difference(
        &mut self,
        layer: usize,
        delta: i64,
        anchor_frequency: u32,
        window_offset: i64,
        value_difference: f32,
    ) {
        let _ = (layer, delta, anchor_frequency, window_offset, value_difference);
    }

    /// Called once per anchor with the accepted siblings.
    fn siblings_found(&mut self, siblings: &[SiblingCandidate]) {
        let _ = siblings;
    }

    /// Called once per recorded group.
    fn group_recorded(&mut self, size: usize) {
        let _ = size;
    }
}

/// Observer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SiblingObserver for NoopObserver {}
