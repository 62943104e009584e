//! Property tests for runner invariants.
//!
//! 1. Detector order does not change the flag table
//! 2. Asset order does not change any asset's flags
//! 3. Repeated runs are identical
//! 4. Summary counts equal the number of set flags per column

use patternlab_core::{AssetId, Bar, BarStore, DetectorConfig, DetectorSet};
use patternlab_runner::{generate_synthetic_bars, run, run_with_options, summarize, RunnerOptions};
use proptest::prelude::*;

// ── Strategies ───────────────────────────────────────────────────────

fn arb_store() -> impl Strategy<Value = (Vec<String>, usize, u64)> {
    (
        prop::collection::btree_set("[A-Z]{3}", 1..5),
        5usize..80,
        any::<u64>(),
    )
        .prop_map(|(assets, days, seed)| (assets.into_iter().collect(), days, seed))
}

fn build_store(assets: &[String], days: usize, seed: u64) -> BarStore {
    let bars: Vec<Bar> = assets
        .iter()
        .flat_map(|a| generate_synthetic_bars(&AssetId::new(a.as_str()), days, seed))
        .collect();
    BarStore::from_bars(bars).unwrap()
}

// ── 1. Detector order ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn detector_order_is_irrelevant(
        (assets, days, seed) in arb_store(),
        rotation in 0usize..13,
    ) {
        let store = build_store(&assets, days, seed);
        let mut configs = DetectorConfig::all_defaults();
        let forward = DetectorSet::from_configs(&configs).unwrap();
        configs.rotate_left(rotation);
        configs.reverse();
        let shuffled = DetectorSet::from_configs(&configs).unwrap();

        prop_assert_eq!(run(&store, &forward), run(&store, &shuffled));
    }

    // ── 2. Asset order ───────────────────────────────────────────────

    #[test]
    fn asset_order_is_irrelevant((assets, days, seed) in arb_store()) {
        let mut reversed = assets.clone();
        reversed.reverse();
        let set = DetectorSet::all_defaults();

        let a = run(&build_store(&assets, days, seed), &set);
        let b = run(&build_store(&reversed, days, seed), &set);
        prop_assert_eq!(a.table.sorted_by_asset(), b.table.sorted_by_asset());
    }

    // ── 3. Determinism ───────────────────────────────────────────────

    #[test]
    fn repeated_runs_are_identical((assets, days, seed) in arb_store()) {
        let store = build_store(&assets, days, seed);
        let set = DetectorSet::all_defaults();
        let first = run(&store, &set);
        let second = run_with_options(&store, &set, &RunnerOptions { parallel: false });
        prop_assert_eq!(first, second);
    }

    // ── 4. Summary counts ────────────────────────────────────────────

    #[test]
    fn summary_counts_match_flags((assets, days, seed) in arb_store()) {
        let store = build_store(&assets, days, seed);
        let out = run(&store, &DetectorSet::all_defaults());
        let rows = summarize(&out.table);
        prop_assert_eq!(rows.len(), assets.len());

        for (row, block) in rows.iter().zip(out.table.blocks()) {
            prop_assert_eq!(&row.asset, &block.asset);
            let mut total = 0;
            for (kind, col) in &block.columns {
                let set = col.iter().filter(|&&f| f).count();
                prop_assert_eq!(row.count(*kind), set);
                total += set;
            }
            prop_assert_eq!(row.total(), total);
        }
    }
}
