//! End-to-end scan: config → data → battery → summary → artifacts.

use patternlab_core::{AssetId, BarStore, DetectorKind};
use patternlab_runner::{
    export_flags_csv, load_artifacts, read_csv, run_scan, save_artifacts, write_csv, RunError,
    ScanConfig, ScanReport,
};

fn synthetic_config(parallel: bool) -> ScanConfig {
    ScanConfig::from_toml(&format!(
        r#"
[data]
source = "synthetic"
assets = ["AAA", "BBB", "CCC"]
days = 120
seed = 11

[runner]
parallel = {parallel}
"#
    ))
    .unwrap()
}

#[test]
fn synthetic_scan_runs_full_battery() {
    let outcome = run_scan(&synthetic_config(true)).unwrap();

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.detectors, DetectorKind::ALL.to_vec());
    assert_eq!(outcome.table.blocks().len(), 3);
    assert_eq!(outcome.table.len(), 360);
    assert_eq!(outcome.summary.len(), 3);

    for (row, block) in outcome.summary.iter().zip(outcome.table.blocks()) {
        assert_eq!(row.asset, block.asset);
        for kind in DetectorKind::ALL {
            assert_eq!(row.count(kind), block.count(kind));
        }
    }
}

#[test]
fn scan_is_reproducible_and_mode_independent() {
    let par = run_scan(&synthetic_config(true)).unwrap();
    let seq = run_scan(&synthetic_config(false)).unwrap();
    assert_eq!(par.data.dataset_hash, seq.data.dataset_hash);
    assert_eq!(par.table, seq.table);
    assert_eq!(par.summary, seq.summary);
}

#[test]
fn configured_detectors_limit_columns() {
    let config = ScanConfig::from_toml(
        r#"
[data]
source = "synthetic"
assets = ["AAA"]
days = 40

[[detectors]]
type = "rsi_extreme"
period = 5

[[detectors]]
type = "gap_reverse"
"#,
    )
    .unwrap();
    let outcome = run_scan(&config).unwrap();
    assert_eq!(
        outcome.table.detectors(),
        vec![DetectorKind::GapReverse, DetectorKind::RsiExtreme]
    );
    assert_eq!(outcome.detectors, vec![DetectorKind::RsiExtreme, DetectorKind::GapReverse]);
}

#[test]
fn csv_scan_reports_bad_asset_and_keeps_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bars.csv");
    std::fs::write(
        &path,
        "asset,day,open,high,low,close\n\
         GOOD,0,10,11,9,10.5\n\
         GOOD,1,10.5,11,10,10.8\n\
         BAD,0,10,11,9,10.5\n\
         BAD,1,10.5,11,10,0\n",
    )
    .unwrap();

    let config = ScanConfig::from_toml(&format!(
        "[data]\nsource = \"csv\"\npath = {:?}\n",
        path.to_string_lossy()
    ))
    .unwrap();
    let outcome = run_scan(&config).unwrap();

    let assets: Vec<&AssetId> = outcome.table.assets();
    assert_eq!(assets, vec![&AssetId::from("GOOD")]);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].asset, AssetId::from("BAD"));

    let report = ScanReport::from_outcome(&outcome);
    assert_eq!(report.asset_count, 2);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].message.contains("non-positive close"));
}

#[test]
fn missing_csv_aborts_scan() {
    let config = ScanConfig::from_toml("[data]\nsource = \"csv\"\npath = \"/nonexistent/bars.csv\"\n").unwrap();
    assert!(matches!(run_scan(&config), Err(RunError::Data(_))));
}

#[test]
fn artifacts_round_trip_through_directory() {
    let outcome = run_scan(&synthetic_config(true)).unwrap();
    let report = ScanReport::from_outcome(&outcome);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("scan");
    save_artifacts(&report, &outcome.table, &out).unwrap();

    for name in ["report.json", "summary.csv", "flags.csv", "report.md"] {
        assert!(out.join(name).exists(), "{name} missing");
    }
    assert_eq!(load_artifacts(&out).unwrap(), report);

    let flags = std::fs::read_to_string(out.join("flags.csv")).unwrap();
    assert_eq!(flags, export_flags_csv(&outcome.table).unwrap());
    // header + 3 assets × 120 days
    assert_eq!(flags.lines().count(), 361);
}

#[test]
fn generated_csv_scans_like_synthetic_source() {
    let synthetic = run_scan(&synthetic_config(true)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bars.csv");
    let file = std::fs::File::create(&path).unwrap();
    write_csv(&synthetic.data.store, file).unwrap();

    let reread: BarStore = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(reread.len(), 3);

    let config = ScanConfig::from_toml(&format!(
        "[data]\nsource = \"csv\"\npath = {:?}\n",
        path.to_string_lossy()
    ))
    .unwrap();
    let from_csv = run_scan(&config).unwrap();
    assert_eq!(from_csv.data.dataset_hash, synthetic.data.dataset_hash);
    assert_eq!(from_csv.table, synthetic.table);
}
