//! PatternStore: the loaded bank in load order plus a value-sorted view.
//!
//! Patterns are pulled from the source in its native (frequency-sorted)
//! order until the running coverage reaches the target. The value order is
//! a stable sort of the ranks by `value`; each pattern remembers its own
//! position in it so the sibling search can centre a window on it.

use std::ops::Range;

use patmerge_core::config::defaults::LOAD_PROGRESS_INTERVAL;
use patmerge_core::errors::{BankError, MergeError};
use patmerge_core::traits::PatternSource;
use patmerge_core::tracing::spans;
use patmerge_core::types::{BankInfo, Pattern};
use tracing::{info, trace};

#[derive(Debug, Clone)]
pub struct PatternStore {
    /// Patterns indexed by `original_rank`.
    patterns: Vec<Pattern>,
    /// Ranks sorted by ascending value. Empty until `build_value_order` runs.
    value_order: Vec<usize>,
    bank_info: BankInfo,
    n_layers: usize,
    cumulative_frequency: u64,
    coverage: f64,
}

impl PatternStore {
    /// Load patterns from `source` until the running coverage reaches
    /// `target_coverage`, `max_count` patterns were read (0 = no limit), or
    /// the source is exhausted. The pattern crossing the target is kept.
    pub fn load<S: PatternSource + ?Sized>(
        source: &S,
        n_layers: usize,
        target_coverage: f64,
        max_count: usize,
    ) -> Result<Self, BankError> {
        let _span = tracing::info_span!(spans::LOAD, target_coverage, max_count).entered();

        let bank_info = source.bank_info();
        let entries = source.entry_count();
        let limit = if max_count == 0 { entries } else { max_count.min(entries) };

        info!(
            coverage = bank_info.coverage,
            entries,
            total_frequency = bank_info.total_frequency,
            tower = bank_info.tower,
            wrap_constant = bank_info.wrap_constant,
            "loading patterns"
        );

        let mut patterns: Vec<Pattern> = Vec::with_capacity(limit);
        let mut cumulative_frequency = 0u64;
        let mut coverage = 0.0f64;

        for rank in 0..limit {
            let (key, frequency) = source.pattern_at(rank)?;
            let (value, value_spread) = source.attributes_at(rank)?;

            if key.len() != n_layers {
                return Err(BankError::KeyLengthMismatch {
                    rank,
                    expected: n_layers,
                    actual: key.len(),
                });
            }
            // Structural assert: `patterns[r].original_rank == r` for every loaded
            // pattern. Unreachable while every rank is pushed in order.
            if patterns.len() != rank {
                return Err(BankError::RankMismatch {
                    rank,
                    loaded: patterns.len(),
                });
            }

            cumulative_frequency += u64::from(frequency);
            coverage = running_coverage(&bank_info, cumulative_frequency);

            if rank % LOAD_PROGRESS_INTERVAL == 0 {
                info!(patterns_loaded = rank, running_coverage = coverage, "load progress");
            }
            trace!(rank, key = %key, value, frequency, running_coverage = coverage, "loaded pattern");

            patterns.push(Pattern::new(key, frequency, value, value_spread, rank));

            if coverage >= target_coverage {
                break;
            }
        }

        info!(
            patterns_loaded = patterns.len(),
            running_coverage = coverage,
            cumulative_frequency,
            "finished loading"
        );

        // A truncated load (max_count) is allowed to stop short of the target.
        if max_count == 0 && bank_info.coverage >= target_coverage && coverage < target_coverage {
            return Err(BankError::CoverageNotReached {
                target: target_coverage,
                reached: coverage,
                bank_coverage: bank_info.coverage,
            });
        }

        Ok(Self {
            patterns,
            value_order: Vec::new(),
            bank_info,
            n_layers,
            cumulative_frequency,
            coverage,
        })
    }

    /// Build the value-sorted order and assign every pattern's `value_position`.
    ///
    /// The sort is stable and uses the IEEE total order, so equal values keep
    /// load order and NaN cannot break the comparison.
    pub fn build_value_order(&mut self) {
        let patterns = &self.patterns;
        let mut order: Vec<usize> = (0..patterns.len()).collect();
        order.sort_by(|&a, &b| patterns[a].value.total_cmp(&patterns[b].value));

        for (position, &rank) in order.iter().enumerate() {
            self.patterns[rank].value_position = Some(position);
        }
        self.value_order = order;
    }

    /// Search window in value-order positions centred on `rank`:
    /// `[max(0, c - delta_n), min(N, c + delta_n))`, or `[0, N)` for `delta_n == 0`.
    pub fn window(&self, rank: usize, delta_n: usize) -> Result<Range<usize>, MergeError> {
        let centre = self.value_position(rank)?;
        let n = self.patterns.len();
        if delta_n == 0 {
            return Ok(0..n);
        }
        Ok(centre.saturating_sub(delta_n)..centre.saturating_add(delta_n).min(n))
    }

    /// Value-order position of `rank`.
    pub fn value_position(&self, rank: usize) -> Result<usize, MergeError> {
        self.pattern(rank)?
            .value_position
            .ok_or(MergeError::ValueOrderNotBuilt)
    }

    /// Rank of the pattern sitting at `position` in value order.
    pub fn rank_at(&self, position: usize) -> Result<usize, MergeError> {
        if self.value_order.is_empty() && !self.patterns.is_empty() {
            return Err(MergeError::ValueOrderNotBuilt);
        }
        self.value_order
            .get(position)
            .copied()
            .ok_or(MergeError::RankOutOfRange {
                rank: position,
                total: self.patterns.len(),
            })
    }

    pub fn pattern(&self, rank: usize) -> Result<&Pattern, MergeError> {
        self.patterns.get(rank).ok_or(MergeError::RankOutOfRange {
            rank,
            total: self.patterns.len(),
        })
    }

    /// All loaded patterns, indexed by original rank.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Ranks in ascending value order (empty before `build_value_order`).
    pub fn value_order(&self) -> &[usize] {
        &self.value_order
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn bank_info(&self) -> &BankInfo {
        &self.bank_info
    }

    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    /// Sum of frequencies of the loaded patterns.
    pub fn cumulative_frequency(&self) -> u64 {
        self.cumulative_frequency
    }

    /// Frequency-weighted coverage of the loaded patterns.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }
}

/// `bank_coverage * cumulative / bank_total`, 0 for a bank without statistics.
///
/// The ratio is taken first so a complete load reproduces the bank coverage
/// exactly.
fn running_coverage(info: &BankInfo, cumulative_frequency: u64) -> f64 {
    if info.total_frequency == 0 {
        return 0.0;
    }
    info.coverage * (cumulative_frequency as f64 / info.total_frequency as f64)
}
