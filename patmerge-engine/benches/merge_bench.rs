use criterion::{criterion_group, criterion_main, Criterion};

use patmerge_core::config::MergeConfig;
use patmerge_core::types::PatternKey;
use patmerge_engine::{BankEntry, InMemoryBank, MergePipeline, PatternIndex, PatternStore};

/// Every key of a 6-layer grid with 4 bins per layer (4096 patterns), with
/// frequencies and values from a fixed LCG so runs are reproducible.
fn build_grid_bank() -> InMemoryBank {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 33) as u32
    };

    let mut entries: Vec<BankEntry> = (0..4u32.pow(6))
        .map(|code| {
            let key = PatternKey::new((0..6).map(|layer| (code >> (2 * layer)) & 3));
            let frequency = next() % 1000 + 1;
            let value = (next() % 10_000) as f32 / 10_000.0;
            BankEntry::new(key, frequency, value, 0.0)
        })
        .collect();
    entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    InMemoryBank::from_entries(1.0, 243, entries)
}

fn config(window_half_width: usize) -> MergeConfig {
    MergeConfig {
        n_layers: Some(6),
        target_coverage: Some(1.0),
        window_half_width: Some(window_half_width),
        record_diagnostics: Some(false),
        ..MergeConfig::default()
    }
}

fn bench_merge_pass(c: &mut Criterion) {
    let bank = build_grid_bank();

    let windowed = MergePipeline::new(config(200));
    c.bench_function("merge_pass_4k_window_200", |b| {
        b.iter(|| windowed.run(&bank).unwrap());
    });

    let unrestricted = MergePipeline::new(config(0));
    c.bench_function("merge_pass_4k_unrestricted", |b| {
        b.iter(|| unrestricted.run(&bank).unwrap());
    });
}

fn bench_store_and_index(c: &mut Criterion) {
    let bank = build_grid_bank();

    c.bench_function("load_and_index_4k", |b| {
        b.iter(|| {
            let mut store = PatternStore::load(&bank, 6, 1.0, 0).unwrap();
            store.build_value_order();
            PatternIndex::build(store.patterns())
        });
    });
}

criterion_group!(benches, bench_merge_pass, bench_store_and_index);
criterion_main!(benches);
