//! Bar sources for the runner.
//!
//! Two sources, selected by `DataConfig`:
//! 1. Synthetic: a seeded geometric random walk per asset (demo data)
//! 2. CSV: `asset,day,open,high,low,close[,volume]` with a header row
//!
//! Both end in `BarStore::from_bars`, so structural checks (gap-free days,
//! one series per asset) are identical regardless of source. Every load
//! also computes a BLAKE3 dataset hash for the scan report.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use patternlab_core::{AssetId, Bar, BarStore, SeriesError};

use crate::config::DataConfig;

const START_PRICE: f64 = 100.0;
const RETURN_SIGMA: f64 = 0.015;
const OPEN_SIGMA: f64 = 0.005;
const WICK_SIGMA: f64 = 0.005;
const VOLUME_MEAN: f64 = 1_000_000.0;
const VOLUME_SIGMA: f64 = 200_000.0;

/// Errors from the data layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
    #[error("no bars loaded")]
    Empty,
}

/// Parameters of the synthetic generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSpec {
    pub assets: Vec<String>,
    pub days: usize,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            assets: ["AAA", "BBB", "CCC", "DDD", "EEE"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            days: 250,
            seed: 42,
        }
    }
}

/// Where a loaded store came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Synthetic,
    Csv,
}

/// A loaded store with provenance.
#[derive(Debug)]
pub struct LoadedData {
    pub store: BarStore,
    pub source: DataSource,
    /// BLAKE3 over all bar data.
    pub dataset_hash: String,
}

/// Resolve a `DataConfig` into a bar store.
pub fn load_store(config: &DataConfig) -> Result<LoadedData, LoadError> {
    let (store, source) = match config {
        DataConfig::Synthetic(spec) => (generate_store(spec)?, DataSource::Synthetic),
        DataConfig::Csv { path } => (load_csv(path)?, DataSource::Csv),
    };
    let dataset_hash = dataset_hash(&store);
    let insane = count_insane_bars(&store);
    if insane > 0 {
        warn!(bars = insane, "bars with inconsistent OHLC (detectors still run on them)");
    }
    info!(
        assets = store.len(),
        bars = store.bar_count(),
        source = ?source,
        hash = %&dataset_hash[..12],
        "bars loaded"
    );
    Ok(LoadedData {
        store,
        source,
        dataset_hash,
    })
}

/// Bars whose high/low do not bound open/close, or with a bad price.
pub fn count_insane_bars(store: &BarStore) -> usize {
    store
        .iter()
        .flat_map(|s| s.bars())
        .filter(|b| !b.is_sane())
        .count()
}

// ─── Synthetic generator ────────────────────────────────────────────

/// Per-asset seed from the master seed and the asset id. Independent of the
/// order in which assets are listed.
pub fn asset_seed(master_seed: u64, asset: &AssetId) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(asset.as_str().as_bytes());
    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Geometric random walk from 100.0 with days `0..days`.
///
/// Prices stay strictly positive: every step multiplies by `exp(x)`.
pub fn generate_synthetic_bars(asset: &AssetId, days: usize, master_seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(asset_seed(master_seed, asset));
    let mut normal = |sigma: f64| -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        z * sigma
    };

    let mut bars = Vec::with_capacity(days);
    let mut prev_close = START_PRICE;
    for day in 0..days {
        let open = prev_close * normal(OPEN_SIGMA).exp();
        let close = prev_close * normal(RETURN_SIGMA).exp();
        let high = open.max(close) * normal(WICK_SIGMA).abs().exp();
        let low = open.min(close) * (-normal(WICK_SIGMA).abs()).exp();
        let volume = (VOLUME_MEAN + normal(VOLUME_SIGMA)).max(1.0);

        bars.push(Bar::new(asset.clone(), day as u32, open, high, low, close).with_volume(volume));
        prev_close = close;
    }
    bars
}

/// Synthetic store for every asset in `spec`, in listed order.
pub fn generate_store(spec: &SyntheticSpec) -> Result<BarStore, LoadError> {
    if spec.assets.is_empty() || spec.days == 0 {
        return Err(LoadError::Empty);
    }
    debug!(assets = spec.assets.len(), days = spec.days, seed = spec.seed, "generating synthetic bars");
    let bars = spec.assets.iter().flat_map(|name| {
        let asset = AssetId::new(name.as_str());
        generate_synthetic_bars(&asset, spec.days, spec.seed)
    });
    Ok(BarStore::from_bars(bars)?)
}

// ─── CSV ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct CsvBar {
    asset: String,
    day: u32,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

impl From<CsvBar> for Bar {
    fn from(row: CsvBar) -> Self {
        Bar {
            asset: AssetId::new(row.asset),
            day: row.day,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Load a bar store from a CSV file.
pub fn load_csv(path: &Path) -> Result<BarStore, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse CSV bars from any reader. Rows may arrive in any order; each asset's
/// bars are sorted by day before the series checks run.
pub fn read_csv<R: Read>(reader: R) -> Result<BarStore, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let bars = rdr
        .deserialize::<CsvBar>()
        .map(|row| row.map(Bar::from))
        .collect::<Result<Vec<_>, _>>()?;
    if bars.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(BarStore::from_bars(bars)?)
}

/// Write a store as CSV. Volume is an empty field where a bar has none.
pub fn write_csv<W: Write>(store: &BarStore, writer: W) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for series in store.iter() {
        for bar in series.bars() {
            wtr.serialize(CsvBar {
                asset: bar.asset.to_string(),
                day: bar.day,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })?;
        }
    }
    wtr.flush().map_err(|e| LoadError::Csv(e.into()))?;
    Ok(())
}

// ─── Dataset hash ───────────────────────────────────────────────────

/// Deterministic BLAKE3 hash over all bars in sorted asset order, so the
/// hash does not depend on how the source listed the assets.
pub fn dataset_hash(store: &BarStore) -> String {
    let mut hasher = blake3::Hasher::new();
    let mut series: Vec<_> = store.iter().collect();
    series.sort_by(|a, b| a.asset().cmp(b.asset()));

    for s in series {
        hasher.update(s.asset().as_str().as_bytes());
        for bar in s.bars() {
            hasher.update(&bar.day.to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            match bar.volume {
                Some(v) => hasher.update(&v.to_le_bytes()),
                None => hasher.update(&[0xff]),
            };
        }
    }

    hasher.finalize().to_hex().to_string()
}
