//! PatternLab Runner — battery orchestration, summaries, data sources, export.
//!
//! This crate builds on `patternlab-core` to provide:
//! - The runner: every detector on every asset, fanned out with rayon
//! - The flag table and per-asset summaries
//! - TOML scan configuration
//! - Bar sources (seeded synthetic generator, CSV) with dataset hashing
//! - CSV / JSON / Markdown export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod summary;
pub mod table;

pub use config::{ConfigError, DataConfig, ScanConfig};
pub use data_loader::{
    dataset_hash, generate_store, generate_synthetic_bars, load_csv, load_store, read_csv,
    write_csv, DataSource, LoadError, LoadedData, SyntheticSpec,
};
pub use export::{
    export_flags_csv, export_json, export_summary_csv, generate_report, import_json,
    load_artifacts, save_artifacts, AssetFailure, ScanReport, SCHEMA_VERSION,
};
pub use runner::{
    run, run_asset, run_scan, run_with_options, DetectorError, RunError, RunOutput,
    RunnerOptions, ScanOutcome,
};
pub use summary::{filter_min_total, summarize, SummaryRow};
pub use table::{AssetFlags, FlagRow, FlagTable};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn flag_table_is_send_sync() {
        assert_send::<FlagTable>();
        assert_sync::<FlagTable>();
        assert_send::<AssetFlags>();
        assert_sync::<AssetFlags>();
    }

    #[test]
    fn run_output_is_send_sync() {
        assert_send::<RunOutput>();
        assert_sync::<RunOutput>();
        assert_send::<DetectorError>();
        assert_sync::<DetectorError>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScanConfig>();
        assert_sync::<ScanConfig>();
        assert_send::<RunnerOptions>();
        assert_sync::<RunnerOptions>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<ScanReport>();
        assert_sync::<ScanReport>();
        assert_send::<SummaryRow>();
        assert_sync::<SummaryRow>();
    }
}
