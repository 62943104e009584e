//! Per-asset signal counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use patternlab_core::{AssetId, DetectorKind};

use crate::table::FlagTable;

/// How many times each detector fired on one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub asset: AssetId,
    pub counts: BTreeMap<DetectorKind, usize>,
}

impl SummaryRow {
    pub fn count(&self, kind: DetectorKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Sum over every detector column.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// One row per asset in table order. Every detector present anywhere in the
/// table gets a count on every row, zero where the asset lacks the column.
pub fn summarize(table: &FlagTable) -> Vec<SummaryRow> {
    let kinds = table.detectors();
    table
        .blocks()
        .iter()
        .map(|block| SummaryRow {
            asset: block.asset.clone(),
            counts: kinds.iter().map(|&k| (k, block.count(k))).collect(),
        })
        .collect()
}

/// Rows whose total reaches `min_total`, in their original order.
pub fn filter_min_total(rows: &[SummaryRow], min_total: usize) -> Vec<&SummaryRow> {
    rows.iter().filter(|r| r.total() >= min_total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AssetFlags;

    fn table() -> FlagTable {
        let mut t = FlagTable::new();
        let mut a = AssetFlags::new("AAA".into(), vec![0, 1, 2]);
        a.columns.insert(DetectorKind::InsideDay, vec![false, true, true]);
        a.columns.insert(DetectorKind::OutsideDay, vec![false, false, true]);
        t.push(a);
        let mut b = AssetFlags::new("BBB".into(), vec![4, 5]);
        b.columns.insert(DetectorKind::InsideDay, vec![false, false]);
        b.columns.insert(DetectorKind::OutsideDay, vec![true, false]);
        t.push(b);
        t
    }

    #[test]
    fn counts_match_set_flags() {
        let rows = summarize(&table());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].asset, AssetId::from("AAA"));
        assert_eq!(rows[0].count(DetectorKind::InsideDay), 2);
        assert_eq!(rows[0].count(DetectorKind::OutsideDay), 1);
        assert_eq!(rows[0].total(), 3);
        assert_eq!(rows[1].count(DetectorKind::InsideDay), 0);
        assert_eq!(rows[1].total(), 1);
    }

    #[test]
    fn absent_detector_counts_zero() {
        let rows = summarize(&table());
        assert_eq!(rows[0].count(DetectorKind::RsiExtreme), 0);
        assert!(!rows[0].counts.contains_key(&DetectorKind::RsiExtreme));
    }

    #[test]
    fn empty_table_has_no_rows() {
        assert!(summarize(&FlagTable::new()).is_empty());
    }

    #[test]
    fn min_total_filter_keeps_order() {
        let rows = summarize(&table());
        let kept: Vec<_> = filter_min_total(&rows, 2).iter().map(|r| r.asset.to_string()).collect();
        assert_eq!(kept, vec!["AAA"]);
        assert_eq!(filter_min_total(&rows, 0).len(), 2);
    }
}
