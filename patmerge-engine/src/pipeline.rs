//! MergePipeline: one full merge pass over a pattern source.
//!
//! Steps:
//! 1. Load patterns up to the coverage target
//! 2. Build the value order and the key index
//! 3. For each unconsumed anchor in rank order: find siblings, select a group, record it
//! 4. Check that no rank was placed twice and compute the compression gain

use patmerge_core::config::MergeConfig;
use patmerge_core::errors::PipelineError;
use patmerge_core::traits::{NoopObserver, PatternSource, SiblingObserver};
use patmerge_core::tracing::spans;
use serde::Serialize;
use tracing::{debug, info};

use crate::diagnostics::{DiagnosticsReport, MergeDiagnostics};
use crate::index::PatternIndex;
use crate::output::MergeSink;
use crate::registry::{GroupId, MergeRegistry};
use crate::selector::SiblingSelector;
use crate::siblings::SiblingFinder;
use crate::store::PatternStore;

/// Groups listed individually at debug level after the pass.
const DEBUG_GROUP_DUMP: usize = 100;

/// Counters describing one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeSummary {
    /// Entries the source reported.
    pub bank_entries: usize,
    /// Patterns actually loaded.
    pub loaded: usize,
    /// Anchors the pass looked at (consumed ones included).
    pub processed: usize,
    pub groups: usize,
    /// Total member slots across groups.
    pub placed: usize,
    pub distinct_placed: usize,
    pub compression_gain: f64,
    pub loaded_coverage: f64,
    pub cumulative_frequency: u64,
    pub wrap_constant: u32,
    pub tower: u32,
}

/// Everything a pass produces.
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// Group of every loaded rank; `None` for ranks a trial limit left unplaced.
    pub group_of: Vec<Option<GroupId>>,
    /// Member ranks of each group, anchor first.
    pub groups: Vec<Vec<usize>>,
    pub summary: MergeSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsReport>,
}

pub struct MergePipeline {
    config: MergeConfig,
}

impl MergePipeline {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(MergeConfig::default())
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Run the pass and hand the outcome to `sink`.
    pub fn run_with_sink<S: PatternSource + ?Sized>(
        &self,
        source: &S,
        sink: &mut dyn MergeSink,
    ) -> Result<MergeOutcome, PipelineError> {
        let outcome = self.run(source)?;
        sink.write(&outcome)?;
        Ok(outcome)
    }

    pub fn run<S: PatternSource + ?Sized>(&self, source: &S) -> Result<MergeOutcome, PipelineError> {
        let cfg = &self.config;
        let _span = tracing::info_span!(
            spans::MERGE,
            n_layers = cfg.effective_n_layers(),
            window_half_width = cfg.effective_window_half_width(),
        )
        .entered();

        let mut store = PatternStore::load(
            source,
            cfg.effective_n_layers(),
            cfg.effective_target_coverage(),
            cfg.effective_max_patterns_to_load(),
        )?;
        store.build_value_order();
        let index = PatternIndex::build(store.patterns());
        let bank_info = *store.bank_info();
        let wrap_constant = cfg.effective_wrap_constant(bank_info.wrap_constant);
        MergeConfig::check_wrap_constant(wrap_constant)?;

        let finder = SiblingFinder::new(&store, cfg.effective_window_half_width(), wrap_constant);
        let selector = SiblingSelector::new(&store, &index);
        let mut registry = MergeRegistry::new(store.len());

        let mut diagnostics = cfg
            .effective_record_diagnostics()
            .then(|| MergeDiagnostics::new(store.n_layers()));
        let mut noop = NoopObserver;
        let observer: &mut dyn SiblingObserver = match diagnostics.as_mut() {
            Some(d) => d as &mut dyn SiblingObserver,
            None => &mut noop,
        };

        let n = store.len();
        let max_trials = cfg.effective_max_trials_to_process();
        let trials = if max_trials == 0 { n } else { max_trials.min(n) };
        let progress_interval = cfg.effective_progress_interval().max(1);

        {
            let _pass = tracing::info_span!(spans::PASS, trials, wrap_constant).entered();
            for rank in 0..trials {
                if rank % progress_interval == 0 {
                    info!(
                        anchor = rank,
                        groups = registry.group_count(),
                        consumed = registry.consumed().count(),
                        "merge progress"
                    );
                }
                if registry.consumed().is_consumed(rank) {
                    debug!(anchor = rank, "already merged, skipping");
                    continue;
                }

                let siblings = finder.find(rank, registry.consumed(), &mut *observer)?;
                let selection = selector.select(rank, &siblings, registry.consumed())?;
                let group = registry.record_group(rank, &selection.absorbed)?;
                observer.group_recorded(selection.level.group_size());

                debug!(
                    anchor = rank,
                    siblings = siblings.len(),
                    level = ?selection.level,
                    absorbed = ?selection.absorbed.as_slice(),
                    group,
                    "recorded group"
                );
            }
        }

        for (id, members) in registry.groups().iter().take(DEBUG_GROUP_DUMP).enumerate() {
            debug!(group = id, members = ?members, "group");
        }

        let report = registry.check_consistency()?;
        let compression_gain = registry.compression_gain();
        info!(
            loaded = n,
            groups = report.groups,
            distinct_placed = report.distinct_placed,
            complete = report.is_complete(),
            compression_gain,
            "merge finished"
        );

        let summary = MergeSummary {
            bank_entries: source.entry_count(),
            loaded: n,
            processed: trials,
            groups: report.groups,
            placed: report.placements,
            distinct_placed: report.distinct_placed,
            compression_gain,
            loaded_coverage: store.coverage(),
            cumulative_frequency: store.cumulative_frequency(),
            wrap_constant,
            tower: bank_info.tower,
        };
        let (group_of, groups) = registry.into_parts();

        Ok(MergeOutcome {
            group_of,
            groups,
            summary,
            diagnostics: diagnostics.map(|d| d.report()),
        })
    }
}
