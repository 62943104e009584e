//! Battery runner — applies a detector set to every asset in a bar store.
//!
//! Two entry points:
//! - `run()` / `run_with_options()`: pure, in-memory. Takes a loaded store and
//!   a built detector set, returns the flag table plus per-asset failures.
//! - `run_scan()`: the full pipeline used by the CLI. Loads data from a
//!   `ScanConfig`, builds the detector set, runs, and summarizes.
//!
//! Assets are independent. Each one is all-or-nothing: if any detector fails
//! on it, none of its flags reach the table and a `DetectorError` is recorded.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use patternlab_core::{
    AssetId, AssetSeries, BarStore, ConfigError as DetectorConfigError, DetectorKind,
    DetectorSet, InvalidInput,
};

use crate::config::{ConfigError, ScanConfig};
use crate::data_loader::{load_store, LoadError, LoadedData};
use crate::summary::{summarize, SummaryRow};
use crate::table::{AssetFlags, FlagTable};

/// One detector rejected one asset's bars.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("detector '{detector}' failed on asset '{asset}': {source}")]
pub struct DetectorError {
    pub detector: DetectorKind,
    pub asset: AssetId,
    pub source: InvalidInput,
}

/// Errors that abort a scan. Per-asset detector failures are not among
/// them; see `ScanOutcome::errors`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("detector config error: {0}")]
    Detectors(#[from] DetectorConfigError),
}

/// Execution knobs for the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerOptions {
    /// Fan assets out across the rayon pool.
    pub parallel: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Flags for every asset that passed, plus one error per asset that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    pub table: FlagTable,
    pub errors: Vec<DetectorError>,
}

impl RunOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// For callers that treat any failed asset as fatal.
    pub fn into_result(self) -> Result<FlagTable, DetectorError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.table),
        }
    }
}

/// Run the battery with default options (parallel).
pub fn run(store: &BarStore, detectors: &DetectorSet) -> RunOutput {
    run_with_options(store, detectors, &RunnerOptions::default())
}

/// Run the battery over every asset in `store`.
///
/// Results are merged back in the store's input order, so parallel and
/// sequential runs produce identical tables.
pub fn run_with_options(
    store: &BarStore,
    detectors: &DetectorSet,
    opts: &RunnerOptions,
) -> RunOutput {
    info!(
        assets = store.len(),
        bars = store.bar_count(),
        detectors = detectors.len(),
        parallel = opts.parallel,
        "running detector battery"
    );

    let results: Vec<Result<AssetFlags, DetectorError>> = if opts.parallel {
        store
            .series()
            .par_iter()
            .map(|series| run_asset(series, detectors))
            .collect()
    } else {
        store
            .iter()
            .map(|series| run_asset(series, detectors))
            .collect()
    };

    let mut output = RunOutput::default();
    for result in results {
        match result {
            Ok(block) => output.table.push(block),
            Err(err) => {
                warn!(
                    asset = %err.asset,
                    detector = %err.detector,
                    error = %err.source,
                    "asset skipped"
                );
                output.errors.push(err);
            }
        }
    }
    output
}

/// All detectors on one asset. The first failure discards the whole block.
pub fn run_asset(series: &AssetSeries, detectors: &DetectorSet) -> Result<AssetFlags, DetectorError> {
    let mut block = AssetFlags::new(series.asset().clone(), series.days());
    for detector in detectors.iter() {
        let flags = detector.detect(series.bars()).map_err(|source| DetectorError {
            detector: detector.kind(),
            asset: series.asset().clone(),
            source,
        })?;
        block.columns.insert(detector.kind(), flags);
    }
    debug!(asset = %series.asset(), bars = series.len(), "asset complete");
    Ok(block)
}

// ─── Full pipeline ──────────────────────────────────────────────────

/// Everything one scan produces.
#[derive(Debug)]
pub struct ScanOutcome {
    pub data: LoadedData,
    pub detectors: Vec<DetectorKind>,
    pub table: FlagTable,
    pub summary: Vec<SummaryRow>,
    pub errors: Vec<DetectorError>,
}

/// Load, build, run, and summarize from a scan config.
///
/// Per-asset detector failures are reported in `ScanOutcome::errors`, not
/// returned as `Err`; only config and data problems abort the scan.
pub fn run_scan(config: &ScanConfig) -> Result<ScanOutcome, RunError> {
    config.validate()?;
    let data = load_store(&config.data)?;
    let detectors = DetectorSet::from_configs(&config.detector_configs())?;
    let opts = RunnerOptions {
        parallel: config.runner.parallel,
    };

    let RunOutput { table, errors } = run_with_options(&data.store, &detectors, &opts);
    let summary = summarize(&table);

    Ok(ScanOutcome {
        data,
        detectors: detectors.kinds(),
        table,
        summary,
        errors,
    })
}
