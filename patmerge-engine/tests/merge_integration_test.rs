//! End-to-end merge passes over small hand-built banks.

use patmerge_core::config::MergeConfig;
use patmerge_core::errors::{BankError, PipelineError};
use patmerge_core::types::{BankInfo, PatternKey};
use patmerge_engine::{BankEntry, InMemoryBank, MergeOutcome, MergePipeline};

fn entry(key: [u32; 3], frequency: u32, value: f32) -> BankEntry {
    BankEntry::new(PatternKey::from(key), frequency, value, 0.0)
}

/// Value order equals load order.
fn bank_of(entries: &[([u32; 3], u32)]) -> InMemoryBank {
    let entries = entries
        .iter()
        .enumerate()
        .map(|(i, &(k, f))| entry(k, f, i as f32))
        .collect();
    InMemoryBank::from_entries(1.0, 243, entries)
}

fn config() -> MergeConfig {
    MergeConfig {
        n_layers: Some(3),
        target_coverage: Some(1.0),
        ..MergeConfig::default()
    }
}

fn run(bank: &InMemoryBank, config: MergeConfig) -> MergeOutcome {
    MergePipeline::new(config).run(bank).unwrap()
}

fn sorted(members: &[usize]) -> Vec<usize> {
    let mut members = members.to_vec();
    members.sort_unstable();
    members
}

/// Every loaded rank is in exactly one group and `group_of` agrees.
fn assert_partition(outcome: &MergeOutcome) {
    let mut seen = vec![false; outcome.group_of.len()];
    for (id, members) in outcome.groups.iter().enumerate() {
        assert!(matches!(members.len(), 1 | 2 | 4 | 8), "group {id} has {} members", members.len());
        for &rank in members {
            assert!(!seen[rank], "rank {rank} placed twice");
            seen[rank] = true;
            assert_eq!(outcome.group_of[rank], Some(id));
        }
    }
    assert!(seen.iter().all(|&s| s), "some rank was never placed");
}

const CUBE: [([u32; 3], u32); 8] = [
    ([10, 10, 10], 5), // A
    ([11, 10, 10], 3), // B
    ([10, 11, 10], 2), // C
    ([10, 10, 11], 1), // D
    ([11, 11, 10], 1), // BC
    ([11, 10, 11], 1), // BD
    ([10, 11, 11], 1), // CD
    ([11, 11, 11], 1), // BCD
];

#[test]
fn full_cube_merges_eight_ways() {
    let outcome = run(&bank_of(&CUBE), config());
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0][0], 0);
    assert_eq!(sorted(&outcome.groups[0]), (0..8).collect::<Vec<_>>());
    assert_partition(&outcome);
    assert!((outcome.summary.compression_gain - 7.0 / 8.0).abs() < 1e-12);
}

#[test]
fn missing_far_corner_falls_back_to_the_heaviest_quad() {
    let outcome = run(&bank_of(&CUBE[..7]), config());
    // A absorbs B, C and BC (3 + 2 + 1 beats the BD and CD squares).
    assert_eq!(outcome.groups[0], vec![0, 1, 2, 4]);
    // D then pairs with BD (tied with CD, first in value order); CD is left alone.
    assert_eq!(outcome.groups[1], vec![3, 5]);
    assert_eq!(outcome.groups[2], vec![6]);
    assert_partition(&outcome);
}

#[test]
fn isolated_patterns_stay_single() {
    let outcome = run(&bank_of(&[([1, 1, 1], 4), ([5, 5, 5], 3), ([9, 1, 9], 2)]), config());
    assert_eq!(outcome.groups, vec![vec![0], vec![1], vec![2]]);
    assert_eq!(outcome.summary.compression_gain, 0.0);
    assert_partition(&outcome);
}

#[test]
fn wrap_constant_makes_cyclic_neighbours_adjacent() {
    let bank = bank_of(&[([0, 5, 5], 2), ([243, 5, 5], 1)]);
    let outcome = run(&bank, config());
    assert_eq!(outcome.groups, vec![vec![0, 1]]);
    assert_eq!(outcome.summary.wrap_constant, 243);

    // A configured wrap constant replaces the bank's.
    let bank = bank_of(&[([0, 5, 5], 2), ([10, 5, 5], 1)]);
    let cfg = MergeConfig {
        wrap_constant: Some(10),
        ..config()
    };
    let outcome = run(&bank, cfg);
    assert_eq!(outcome.groups, vec![vec![0, 1]]);
    assert_eq!(outcome.summary.wrap_constant, 10);
}

#[test]
fn loading_stops_once_the_target_coverage_is_crossed() {
    let entries = vec![
        entry([1, 1, 1], 5, 0.0),
        entry([2, 1, 1], 3, 0.1),
        entry([3, 1, 1], 1, 0.2),
        entry([4, 1, 1], 1, 0.3),
    ];
    let bank = InMemoryBank::from_entries(0.9, 243, entries);
    let cfg = MergeConfig {
        target_coverage: Some(0.5),
        ..config()
    };
    let outcome = run(&bank, cfg);
    // 0.9 * 5/10 = 0.45, then 0.9 * 8/10 = 0.72 crosses the target.
    assert_eq!(outcome.summary.loaded, 2);
    assert_eq!(outcome.summary.bank_entries, 4);
    assert_eq!(outcome.group_of.len(), 2);
    assert!((outcome.summary.loaded_coverage - 0.72).abs() < 1e-9);
    assert_eq!(outcome.groups, vec![vec![0, 1]]);
}

#[test]
fn pattern_limit_caps_the_load() {
    let cfg = MergeConfig {
        max_patterns_to_load: Some(3),
        ..config()
    };
    let outcome = run(&bank_of(&CUBE), cfg);
    assert_eq!(outcome.summary.loaded, 3);
    assert_partition(&outcome);
}

#[test]
fn unreachable_target_is_reported() {
    let bank = InMemoryBank::new(
        BankInfo {
            coverage: 1.0,
            total_frequency: 100,
            tower: 0,
            wrap_constant: 243,
        },
        vec![entry([1, 1, 1], 5, 0.0), entry([2, 1, 1], 5, 0.1)],
    );
    let cfg = MergeConfig {
        target_coverage: Some(0.95),
        ..config()
    };
    let err = MergePipeline::new(cfg).run(&bank).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Bank(BankError::CoverageNotReached { .. })
    ));
}

#[test]
fn target_above_bank_coverage_loads_everything() {
    let entries = vec![entry([1, 1, 1], 5, 0.0), entry([7, 7, 7], 5, 0.1)];
    let bank = InMemoryBank::from_entries(0.8, 243, entries);
    let cfg = MergeConfig {
        target_coverage: Some(0.95),
        ..config()
    };
    let outcome = run(&bank, cfg);
    assert_eq!(outcome.summary.loaded, 2);
    assert!((outcome.summary.loaded_coverage - 0.8).abs() < 1e-12);
}

#[test]
fn narrow_window_hides_distant_siblings() {
    // A and its sibling sit at opposite ends of the value order.
    let entries = vec![
        entry([1, 1, 1], 4, 0.0),
        entry([9, 9, 9], 3, 0.5),
        entry([20, 20, 20], 2, 0.6),
        entry([2, 1, 1], 1, 1.0),
    ];
    let bank = InMemoryBank::from_entries(1.0, 243, entries);

    let unrestricted = run(&bank, config());
    assert_eq!(unrestricted.groups[0], vec![0, 3]);

    let narrow = run(
        &bank,
        MergeConfig {
            window_half_width: Some(2),
            ..config()
        },
    );
    assert_eq!(narrow.groups[0], vec![0]);
    assert_eq!(narrow.groups.len(), 4);
    assert_partition(&narrow);
}

#[test]
fn trial_limit_processes_a_prefix() {
    let cfg = MergeConfig {
        max_trials_to_process: Some(1),
        ..config()
    };
    let outcome = run(&bank_of(&CUBE[..7]), cfg);
    assert_eq!(outcome.summary.processed, 1);
    assert_eq!(outcome.groups, vec![vec![0, 1, 2, 4]]);
    assert_eq!(outcome.group_of[3], None);
    assert_eq!(outcome.summary.distinct_placed, 4);
}

#[test]
fn repeated_runs_are_identical() {
    let bank = bank_of(&CUBE[..7]);
    let first = run(&bank, config());
    let second = run(&bank, config());
    assert_eq!(first.groups, second.groups);
    assert_eq!(first.group_of, second.group_of);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn diagnostics_track_group_sizes() {
    let outcome = run(&bank_of(&CUBE[..7]), config());
    let report = outcome.diagnostics.unwrap();
    let merged = report.histogram("n_merged").unwrap();
    assert_eq!(merged.bin_content(0), 1.0);
    assert_eq!(merged.bin_content(1), 1.0);
    assert_eq!(merged.bin_content(3), 1.0);
    assert_eq!(merged.entries, 3);

    let siblings = report.histogram("n_siblings").unwrap();
    assert_eq!(siblings.entries, 3);
}

#[test]
fn bank_file_round_trip_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.json");
    let bank = bank_of(&CUBE);
    std::fs::write(&path, serde_json::to_string(&bank).unwrap()).unwrap();

    let loaded = InMemoryBank::from_json_file(&path).unwrap();
    assert_eq!(loaded, bank);
    assert_eq!(run(&loaded, config()).groups, run(&bank, config()).groups);
}

/// Key of a 2×2×2×2 hypercube vertex around `[5, 5, 5, 5]`: bit `l` of
/// `code` raises layer `l` by one.
fn hypercube_key(code: usize) -> [u32; 4] {
    std::array::from_fn(|layer| 5 + ((code >> layer) & 1) as u32)
}

/// Rank and value both equal the vertex code, so the anchor's siblings come
/// in layer order. The anchor is heaviest; vertices raised on `heavy_layer`
/// outweigh the rest.
fn hypercube_bank(heavy_layer: usize) -> InMemoryBank {
    let entries = (0..16usize)
        .map(|code| {
            let frequency = match code {
                0 => 100,
                c if (c >> heavy_layer) & 1 == 1 => 10,
                _ => 1,
            };
            BankEntry::new(PatternKey::from(hypercube_key(code)), frequency, code as f32, 0.0)
        })
        .collect();
    InMemoryBank::from_entries(1.0, 243, entries)
}

/// Layers on which the members of a group do not all agree.
fn spanned_layers(members: &[usize]) -> Vec<usize> {
    let first = hypercube_key(members[0]);
    (0..4)
        .filter(|&layer| members.iter().any(|&m| hypercube_key(m)[layer] != first[layer]))
        .collect()
}

fn hypercube_config() -> MergeConfig {
    MergeConfig {
        n_layers: Some(4),
        ..config()
    }
}

#[test]
fn octet_takes_the_heaviest_cube_of_a_hypercube() {
    let outcome = run(&hypercube_bank(3), hypercube_config());

    // The {0, 1, 2} cube sums 7; the three cubes through layer 3 tie at 43
    // and the first of them, {0, 1, 3}, wins.
    assert_eq!(outcome.groups[0], vec![0, 1, 2, 8, 11, 10, 9, 3]);
    assert_eq!(spanned_layers(&outcome.groups[0]), vec![0, 1, 3]);
    assert!(outcome.groups[0].iter().all(|&m| hypercube_key(m)[2] == 5));

    // The opposite cube is still whole and merges around vertex 4.
    assert_eq!(outcome.groups.len(), 2);
    assert_eq!(outcome.groups[1], vec![4, 5, 6, 12, 15, 14, 13, 7]);
    assert_eq!(spanned_layers(&outcome.groups[1]), vec![0, 1, 3]);
    assert_partition(&outcome);
}

#[test]
fn equal_weight_cubes_keep_the_first_layer_triple() {
    // {0, 1, 2}, {0, 1, 3} and {1, 2, 3} all sum 43; {0, 2, 3} sums 7.
    let outcome = run(&hypercube_bank(1), hypercube_config());
    assert_eq!(outcome.groups[0], vec![0, 1, 2, 4, 7, 6, 5, 3]);
    assert_eq!(spanned_layers(&outcome.groups[0]), vec![0, 1, 2]);
    assert_eq!(outcome.groups.len(), 2);
    assert_partition(&outcome);
}
