//! Flag table — the runner's output, keyed by (asset, day, detector).
//!
//! Stored column-wise per asset: one `Vec<bool>` per detector, aligned with
//! the asset's days. Columns live in a `BTreeMap` keyed by `DetectorKind`, so
//! the order in which detectors ran never shows up in the table.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use patternlab_core::{AssetId, DetectorKind};

/// All flags for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetFlags {
    pub asset: AssetId,
    pub days: Vec<u32>,
    pub columns: BTreeMap<DetectorKind, Vec<bool>>,
}

impl AssetFlags {
    pub fn new(asset: AssetId, days: Vec<u32>) -> Self {
        Self {
            asset,
            days,
            columns: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn offset(&self, day: u32) -> Option<usize> {
        let first = *self.days.first()?;
        let offset = day.checked_sub(first)? as usize;
        (offset < self.days.len()).then_some(offset)
    }

    pub fn get(&self, day: u32, kind: DetectorKind) -> Option<bool> {
        let offset = self.offset(day)?;
        self.columns.get(&kind)?.get(offset).copied()
    }

    pub fn column(&self, kind: DetectorKind) -> Option<&[bool]> {
        self.columns.get(&kind).map(|c| c.as_slice())
    }

    /// Number of set flags in one column.
    pub fn count(&self, kind: DetectorKind) -> usize {
        self.column(kind)
            .map(|c| c.iter().filter(|&&f| f).count())
            .unwrap_or(0)
    }

    /// Days on which `kind` fired.
    pub fn flagged_days(&self, kind: DetectorKind) -> Vec<u32> {
        match self.column(kind) {
            Some(col) => self
                .days
                .iter()
                .zip(col)
                .filter(|(_, &f)| f)
                .map(|(&d, _)| d)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// One (asset, day) row with every detector's flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagRow<'a> {
    pub asset: &'a AssetId,
    pub day: u32,
    pub flags: BTreeMap<DetectorKind, bool>,
}

/// Flags for every processed asset, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlagTable {
    blocks: Vec<AssetFlags>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, block: AssetFlags) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[AssetFlags] {
        &self.blocks
    }

    pub fn asset(&self, asset: &AssetId) -> Option<&AssetFlags> {
        self.blocks.iter().find(|b| &b.asset == asset)
    }

    pub fn assets(&self) -> Vec<&AssetId> {
        self.blocks.iter().map(|b| &b.asset).collect()
    }

    /// Every detector column present in any asset, in registry order.
    pub fn detectors(&self) -> Vec<DetectorKind> {
        let kinds: BTreeSet<DetectorKind> = self
            .blocks
            .iter()
            .flat_map(|b| b.columns.keys().copied())
            .collect();
        kinds.into_iter().collect()
    }

    pub fn get(&self, asset: &AssetId, day: u32, kind: DetectorKind) -> Option<bool> {
        self.asset(asset)?.get(day, kind)
    }

    pub fn column(&self, asset: &AssetId, kind: DetectorKind) -> Option<&[bool]> {
        self.asset(asset)?.column(kind)
    }

    /// Row view in (asset input order, day) order. A column shorter than its
    /// asset's days has no entry in the rows past its end.
    pub fn rows(&self) -> impl Iterator<Item = FlagRow<'_>> {
        self.blocks.iter().flat_map(|block| {
            block.days.iter().enumerate().map(move |(i, &day)| FlagRow {
                asset: &block.asset,
                day,
                flags: block
                    .columns
                    .iter()
                    .filter_map(|(&k, col)| col.get(i).map(|&f| (k, f)))
                    .collect(),
            })
        })
    }

    /// Total number of (asset, day) rows.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.is_empty())
    }

    /// Same contents with asset blocks sorted by id. Used to compare tables
    /// built from differently ordered inputs.
    pub fn sorted_by_asset(&self) -> Self {
        let mut blocks = self.blocks.clone();
        blocks.sort_by(|a, b| a.asset.cmp(&b.asset));
        Self { blocks }
    }
}
