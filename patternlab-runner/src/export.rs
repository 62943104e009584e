//! Reporting and export — CSV, JSON, and Markdown artifacts for one scan.
//!
//! - **Flags CSV**: `asset,day,<detector keys…>` with 0/1 cells
//! - **Summary CSV**: `asset,<detector keys…>,total`
//! - **JSON**: the `ScanReport`, with schema versioning
//! - **Markdown**: a human-readable summary table
//!
//! Unknown schema versions are rejected on load.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use patternlab_core::{AssetId, DetectorKind};

use crate::runner::{DetectorError, ScanOutcome};
use crate::summary::SummaryRow;
use crate::table::FlagTable;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// One asset the battery could not process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetFailure {
    pub asset: AssetId,
    pub detector: DetectorKind,
    pub message: String,
}

impl From<&DetectorError> for AssetFailure {
    fn from(err: &DetectorError) -> Self {
        Self {
            asset: err.asset.clone(),
            detector: err.detector,
            message: err.source.to_string(),
        }
    }
}

/// Persisted result of one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub dataset_hash: String,
    pub asset_count: usize,
    pub bar_count: usize,
    pub detectors: Vec<DetectorKind>,
    pub summary: Vec<SummaryRow>,
    #[serde(default)]
    pub errors: Vec<AssetFailure>,
}

impl ScanReport {
    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            dataset_hash: outcome.data.dataset_hash.clone(),
            asset_count: outcome.data.store.len(),
            bar_count: outcome.data.store.bar_count(),
            detectors: outcome.detectors.clone(),
            summary: outcome.summary.clone(),
            errors: outcome.errors.iter().map(AssetFailure::from).collect(),
        }
    }
}

// ─── JSON ───────────────────────────────────────────────────────────

pub fn export_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScanReport to JSON")
}

/// Deserialize a `ScanReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanReport> {
    let report: ScanReport =
        serde_json::from_str(json).context("failed to deserialize ScanReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV ────────────────────────────────────────────────────────────

/// One row per (asset, day), one 0/1 column per detector in registry order.
pub fn export_flags_csv(table: &FlagTable) -> Result<String> {
    let kinds = table.detectors();
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["asset".to_string(), "day".to_string()];
    header.extend(kinds.iter().map(|k| k.key().to_string()));
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.asset.to_string(), row.day.to_string()];
        record.extend(kinds.iter().map(|k| {
            let set = row.flags.get(k).copied().unwrap_or(false);
            String::from(if set { "1" } else { "0" })
        }));
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Per-asset counts plus the derived total.
pub fn export_summary_csv(rows: &[SummaryRow]) -> Result<String> {
    let mut kinds: Vec<DetectorKind> = rows.iter().flat_map(|r| r.counts.keys().copied()).collect();
    kinds.sort();
    kinds.dedup();

    let mut wtr = csv::Writer::from_writer(vec![]);
    let mut header = vec!["asset".to_string()];
    header.extend(kinds.iter().map(|k| k.key().to_string()));
    header.push("total".to_string());
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.asset.to_string()];
        record.extend(kinds.iter().map(|&k| row.count(k).to_string()));
        record.push(row.total().to_string());
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown ───────────────────────────────────────────────────────

pub fn generate_report(report: &ScanReport) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str("# Pattern Scan Report\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Assets | {} |\n", report.asset_count));
    md.push_str(&format!("| Bars | {} |\n", report.bar_count));
    md.push_str(&format!("| Detectors | {} |\n", report.detectors.len()));
    md.push_str(&format!("| Dataset Hash | {} |\n", report.dataset_hash));
    md.push('\n');

    md.push_str("## Signal Counts\n\n");
    md.push_str("| Asset |");
    for k in &report.detectors {
        md.push_str(&format!(" {} |", k.label()));
    }
    md.push_str(" Total |\n|---|");
    for _ in &report.detectors {
        md.push_str("---|");
    }
    md.push_str("---|\n");
    for row in &report.summary {
        md.push_str(&format!("| {} |", row.asset));
        for &k in &report.detectors {
            md.push_str(&format!(" {} |", row.count(k)));
        }
        md.push_str(&format!(" {} |\n", row.total()));
    }
    md.push('\n');

    if !report.errors.is_empty() {
        md.push_str("## Skipped Assets\n\n");
        for e in &report.errors {
            md.push_str(&format!("- {} ({}): {}\n", e.asset, e.detector, e.message));
        }
        md.push('\n');
    }

    md
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `report.json`, `summary.csv`, `flags.csv` and `report.md` into
/// `output_dir`, creating it if needed.
pub fn save_artifacts(report: &ScanReport, table: &FlagTable, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create artifact dir: {}", output_dir.display()))?;

    let write = |name: &str, content: String| -> Result<()> {
        let path = output_dir.join(name);
        std::fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))
    };

    write("report.json", export_json(report)?)?;
    write("summary.csv", export_summary_csv(&report.summary)?)?;
    write("flags.csv", export_flags_csv(table)?)?;
    write("report.md", generate_report(report))?;
    Ok(())
}

/// Load a `ScanReport` from an artifact directory.
pub fn load_artifacts(dir: &Path) -> Result<ScanReport> {
    let path = dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AssetFlags;
    use std::collections::BTreeMap;

    fn table() -> FlagTable {
        let mut t = FlagTable::new();
        let mut a = AssetFlags::new("AAA".into(), vec![0, 1]);
        a.columns.insert(DetectorKind::OutsideDay, vec![false, true]);
        a.columns.insert(DetectorKind::InsideDay, vec![true, false]);
        t.push(a);
        t
    }

    fn report() -> ScanReport {
        let mut counts = BTreeMap::new();
        counts.insert(DetectorKind::InsideDay, 1);
        counts.insert(DetectorKind::OutsideDay, 1);
        ScanReport {
            schema_version: SCHEMA_VERSION,
            dataset_hash: "abc123".into(),
            asset_count: 2,
            bar_count: 4,
            detectors: vec![DetectorKind::InsideDay, DetectorKind::OutsideDay],
            summary: vec![SummaryRow {
                asset: "AAA".into(),
                counts,
            }],
            errors: vec![AssetFailure {
                asset: "BAD".into(),
                detector: DetectorKind::InsideDay,
                message: "empty bar series".into(),
            }],
        }
    }

    #[test]
    fn flags_csv_layout() {
        let csv = export_flags_csv(&table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "asset,day,inside_day,outside_day");
        assert_eq!(lines[1], "AAA,0,1,0");
        assert_eq!(lines[2], "AAA,1,0,1");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn flags_csv_fills_short_column_with_zero() {
        let mut t = FlagTable::new();
        let mut a = AssetFlags::new("AAA".into(), vec![0, 1, 2]);
        a.columns.insert(DetectorKind::InsideDay, vec![true]);
        t.push(a);
        let csv = export_flags_csv(&t).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["asset,day,inside_day", "AAA,0,1", "AAA,1,0", "AAA,2,0"]);
    }

    #[test]
    fn summary_csv_has_total() {
        let csv = export_summary_csv(&report().summary).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "asset,inside_day,outside_day,total");
        assert_eq!(lines[1], "AAA,1,1,2");
    }

    #[test]
    fn empty_inputs_give_header_only() {
        let csv = export_flags_csv(&FlagTable::new()).unwrap();
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["asset,day"]);
        let csv = export_summary_csv(&[]).unwrap();
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["asset,total"]);
    }

    #[test]
    fn json_restores_report() {
        let original = report();
        let restored = import_json(&export_json(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn json_rejects_unknown_version() {
        let mut r = report();
        r.schema_version = 99;
        let err = import_json(&export_json(&r).unwrap()).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 99"));
    }

    #[test]
    fn json_without_version_defaults_to_current() {
        let mut value = serde_json::to_value(report()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let restored = import_json(&value.to_string()).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn markdown_lists_counts_and_skips() {
        let md = generate_report(&report());
        assert!(md.contains("# Pattern Scan Report"));
        assert!(md.contains("| Inside Day | Outside Day | Total |"));
        assert!(md.contains("| AAA | 1 | 1 | 2 |"));
        assert!(md.contains("## Skipped Assets"));
        assert!(md.contains("BAD (inside_day)"));
    }
}
