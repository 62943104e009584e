//! Per-asset bar sequences and the multi-asset store the runner consumes.
//!
//! An `AssetSeries` is validated once at construction and immutable after that.
//! Detectors never see a concatenation of assets: the store hands out one
//! series at a time, so every rolling window stays inside its own asset.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use super::{AssetId, Bar};

/// Structural errors when assembling series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series for '{asset}' is empty")]
    Empty { asset: AssetId },

    #[error("bar at index {index} belongs to '{found}', expected '{expected}'")]
    MixedAssets {
        expected: AssetId,
        found: AssetId,
        index: usize,
    },

    #[error("'{asset}': day {found} at index {index} does not follow day {previous}")]
    DayGap {
        asset: AssetId,
        index: usize,
        previous: u32,
        found: u32,
    },

    #[error("duplicate series for asset '{0}'")]
    DuplicateAsset(AssetId),
}

/// Ordered, gap-free, single-asset bar sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSeries {
    asset: AssetId,
    bars: Vec<Bar>,
}

impl AssetSeries {
    /// Validate and wrap a bar sequence.
    ///
    /// Requires at least one bar, every bar tagged with `asset`, and days
    /// increasing by exactly one.
    pub fn new(asset: impl Into<AssetId>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let asset = asset.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { asset });
        }

        for (index, bar) in bars.iter().enumerate() {
            if bar.asset != asset {
                return Err(SeriesError::MixedAssets {
                    expected: asset,
                    found: bar.asset.clone(),
                    index,
                });
            }
            if index > 0 {
                let previous = bars[index - 1].day;
                if previous.checked_add(1) != Some(bar.day) {
                    return Err(SeriesError::DayGap {
                        asset,
                        index,
                        previous,
                        found: bar.day,
                    });
                }
            }
        }

        Ok(Self { asset, bars })
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn days(&self) -> Vec<u32> {
        self.bars.iter().map(|b| b.day).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first_day(&self) -> u32 {
        self.bars[0].day
    }

    pub fn last_day(&self) -> u32 {
        self.bars[self.bars.len() - 1].day
    }

    /// Bar for a given day, if it falls within the series.
    pub fn bar_at_day(&self, day: u32) -> Option<&Bar> {
        let offset = day.checked_sub(self.first_day())? as usize;
        self.bars.get(offset)
    }
}

/// Insertion-ordered collection of asset series.
///
/// Iteration order is the order in which assets were first added; the runner
/// and summarizer preserve it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarStore {
    series: Vec<AssetSeries>,
    #[serde(skip)]
    index: HashMap<AssetId, usize>,
}

impl BarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a series. Fails if the asset is already present.
    pub fn insert(&mut self, series: AssetSeries) -> Result<(), SeriesError> {
        if self.index.contains_key(series.asset()) {
            return Err(SeriesError::DuplicateAsset(series.asset().clone()));
        }
        self.index.insert(series.asset().clone(), self.series.len());
        self.series.push(series);
        Ok(())
    }

    /// Build a store from loose bars of any number of assets.
    ///
    /// Assets keep their first-appearance order; bars within an asset are
    /// sorted by day before validation.
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Result<Self, SeriesError> {
        let mut order: Vec<AssetId> = Vec::new();
        let mut grouped: HashMap<AssetId, Vec<Bar>> = HashMap::new();
        for bar in bars {
            let entry = grouped.entry(bar.asset.clone()).or_insert_with(|| {
                order.push(bar.asset.clone());
                Vec::new()
            });
            entry.push(bar);
        }

        let mut store = Self::new();
        for asset in order {
            let mut group = grouped.remove(&asset).unwrap_or_default();
            group.sort_by_key(|b| b.day);
            store.insert(AssetSeries::new(asset, group)?)?;
        }
        Ok(store)
    }

    pub fn get(&self, asset: &AssetId) -> Option<&AssetSeries> {
        self.index.get(asset).map(|&i| &self.series[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetSeries> {
        self.series.iter()
    }

    pub fn series(&self) -> &[AssetSeries] {
        &self.series
    }

    pub fn assets(&self) -> Vec<&AssetId> {
        self.series.iter().map(|s| s.asset()).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of bars across all assets.
    pub fn bar_count(&self) -> usize {
        self.series.iter().map(|s| s.len()).sum()
    }
}
