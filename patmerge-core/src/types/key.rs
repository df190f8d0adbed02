//! Fixed-width pattern key.
//!
//! A key is one superstrip bin per detector layer. Equality and hashing are
//! structural over the whole sequence, so a key can be used directly as a
//! hash-map key for exact-match lookup of hypothetical combined patterns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collections::SmallVec8;

/// Ordered, fixed-length sequence of coordinate bins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternKey(SmallVec8<u32>);

impl PatternKey {
    /// Build a key from any sequence of bins.
    pub fn new(bins: impl IntoIterator<Item = u32>) -> Self {
        Self(bins.into_iter().collect())
    }

    /// Number of layers in this key.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bin at `layer`, if the layer exists.
    pub fn get(&self, layer: usize) -> Option<u32> {
        self.0.get(layer).copied()
    }

    pub fn bins(&self) -> &[u32] {
        &self.0
    }

    /// Return a copy with `delta` added to the bin at `layer`.
    ///
    /// `None` if the layer is out of range or the shifted bin would leave the
    /// `u32` domain; such a key cannot exist in any bank.
    pub fn shifted(&self, layer: usize, delta: i32) -> Option<Self> {
        let mut out = self.clone();
        out.shift_in_place(layer, delta)?;
        Some(out)
    }

    /// In-place variant of [`PatternKey::shifted`].
    pub fn shift_in_place(&mut self, layer: usize, delta: i32) -> Option<()> {
        let bin = self.0.get_mut(layer)?;
        *bin = bin.checked_add_signed(delta)?;
        Some(())
    }

    /// Compare against `other` and report the single differing layer.
    ///
    /// Returns `Some((layer, other[layer] - self[layer]))` only when the keys
    /// have equal length and differ in exactly one coordinate. Stops at the
    /// second difference.
    pub fn single_difference(&self, other: &PatternKey) -> Option<(usize, i64)> {
        if self.0.len() != other.0.len() {
            return None;
        }
        let mut found: Option<(usize, i64)> = None;
        for (layer, (&a, &b)) in self.0.iter().zip(other.0.iter()).enumerate() {
            if a != b {
                if found.is_some() {
                    return None;
                }
                found = Some((layer, i64::from(b) - i64::from(a)));
            }
        }
        found
    }
}

impl From<Vec<u32>> for PatternKey {
    fn from(bins: Vec<u32>) -> Self {
        Self::new(bins)
    }
}

impl<const N: usize> From<[u32; N]> for PatternKey {
    fn from(bins: [u32; N]) -> Self {
        Self::new(bins)
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bin in &self.0 {
            write!(f, "{:>6}", bin)?;
        }
        Ok(())
    }
}
