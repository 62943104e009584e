//! Plain-text views of a scan: the summary table and a single-detector
//! overlay for one asset. Both degrade to a short notice when the asset or
//! detector is missing.

use std::fmt::Write;

use patternlab_core::{AssetId, BarStore, DetectorKind};
use patternlab_runner::{filter_min_total, FlagTable, SummaryRow};

/// Summary table with a total column, keeping rows whose total reaches
/// `min_signals`.
pub fn summary_table(rows: &[SummaryRow], kinds: &[DetectorKind], min_signals: usize) -> String {
    let kept = filter_min_total(rows, min_signals);
    let mut out = String::new();
    if kept.is_empty() {
        let _ = writeln!(out, "No assets with at least {min_signals} signal(s).");
        return out;
    }

    let width = kinds.iter().map(|k| k.key().len()).max().unwrap_or(0).max(5);
    let _ = write!(out, "{:<8}", "Asset");
    for k in kinds {
        let _ = write!(out, " {:>width$}", k.key());
    }
    let _ = writeln!(out, " {:>width$}", "total");
    let _ = writeln!(out, "{}", "-".repeat(8 + (kinds.len() + 1) * (width + 1)));

    for row in kept {
        let _ = write!(out, "{:<8}", row.asset);
        for &k in kinds {
            let _ = write!(out, " {:>width$}", row.count(k));
        }
        let _ = writeln!(out, " {:>width$}", row.total());
    }
    out
}

/// Days on which `kind` fired for `asset`, with that day's OHLC.
pub fn overlay(store: &BarStore, table: &FlagTable, asset: &AssetId, kind: DetectorKind) -> String {
    let mut out = String::new();
    let (Some(series), Some(flags)) = (store.get(asset), table.asset(asset)) else {
        let _ = writeln!(out, "No flags for '{asset}' (unknown or skipped asset).");
        return out;
    };
    if flags.column(kind).is_none() {
        let _ = writeln!(out, "Detector '{kind}' was not run.");
        return out;
    }

    let days = flags.flagged_days(kind);
    let _ = writeln!(
        out,
        "{} on {}: {} of {} bars flagged",
        kind.label(),
        asset,
        days.len(),
        series.len()
    );
    if days.is_empty() {
        return out;
    }
    let _ = writeln!(
        out,
        "{:>6} {:>10} {:>10} {:>10} {:>10}",
        "day", "open", "high", "low", "close"
    );
    for day in days {
        if let Some(bar) = series.bar_at_day(day) {
            let _ = writeln!(
                out,
                "{:>6} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                day, bar.open, bar.high, bar.low, bar.close
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use patternlab_core::{Bar, DetectorSet};
    use patternlab_runner::{run, summarize};

    fn scan() -> (BarStore, FlagTable) {
        let bars = vec![
            Bar::new("AAA", 0, 100.0, 101.0, 99.0, 100.0),
            Bar::new("AAA", 1, 100.0, 100.5, 99.5, 100.0),
            Bar::new("AAA", 2, 100.0, 102.0, 98.0, 100.0),
        ];
        let store = BarStore::from_bars(bars).unwrap();
        let set = DetectorSet::from_keys(&["inside_day", "outside_day"]).unwrap();
        let table = run(&store, &set).table;
        (store, table)
    }

    #[test]
    fn summary_has_total_and_respects_threshold() {
        let (_, table) = scan();
        let rows = summarize(&table);
        let kinds = table.detectors();
        let text = summary_table(&rows, &kinds, 0);
        assert!(text.contains("inside_day"));
        assert!(text.contains("total"));
        assert!(text.lines().any(|l| l.starts_with("AAA")));

        let text = summary_table(&rows, &kinds, 99);
        assert!(text.starts_with("No assets"));
    }

    #[test]
    fn overlay_lists_flagged_days() {
        let (store, table) = scan();
        let text = overlay(&store, &table, &"AAA".into(), DetectorKind::InsideDay);
        assert!(text.contains("1 of 3 bars flagged"));
        assert!(text.contains("100.50"));
    }

    #[test]
    fn overlay_degrades_on_missing_asset_or_detector() {
        let (store, table) = scan();
        let text = overlay(&store, &table, &"ZZZ".into(), DetectorKind::InsideDay);
        assert!(text.contains("unknown or skipped"));
        let text = overlay(&store, &table, &"AAA".into(), DetectorKind::RsiExtreme);
        assert!(text.contains("was not run"));
    }
}
