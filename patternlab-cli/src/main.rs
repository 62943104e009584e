//! PatternLab CLI — scan, detector listing, and synthetic data generation.
//!
//! Commands:
//! - `scan` — run the detector battery from a TOML config and/or flags
//! - `detectors` — list detector keys, labels, and default parameters
//! - `generate` — write seeded synthetic bars as CSV

mod view;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use patternlab_core::{AssetId, DetectorConfig, DetectorKind};
use patternlab_runner::{
    generate_store, run_scan, save_artifacts, write_csv, DataConfig, ScanConfig, ScanReport,
    SyntheticSpec,
};

#[derive(Parser)]
#[command(
    name = "patternlab",
    about = "PatternLab CLI — daily bar pattern scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detector battery and print per-asset signal counts.
    Scan {
        /// Path to a TOML scan config. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Synthetic assets (comma separated).
        #[arg(long, value_delimiter = ',')]
        assets: Option<Vec<String>>,

        /// Synthetic days per asset.
        #[arg(long)]
        days: Option<usize>,

        /// Synthetic master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Read bars from a CSV file instead of generating them.
        #[arg(long, conflicts_with_all = ["assets", "days", "seed"])]
        csv: Option<PathBuf>,

        /// Detector keys to run (comma separated). Defaults to all.
        #[arg(long, value_delimiter = ',')]
        detectors: Option<Vec<String>>,

        /// Only show assets with at least this many signals in total.
        #[arg(long, default_value_t = 0)]
        min_signals: usize,

        /// Asset for the overlay view (requires --detector).
        #[arg(long, requires = "detector")]
        asset: Option<String>,

        /// Detector key for the overlay view (requires --asset).
        #[arg(long, requires = "asset")]
        detector: Option<String>,

        /// Write report.json, summary.csv, flags.csv and report.md here.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Run assets one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// List detectors with their keys, labels, and default parameters.
    Detectors,
    /// Write synthetic bars as CSV.
    Generate {
        /// Assets (comma separated).
        #[arg(long, value_delimiter = ',', default_value = "AAA,BBB,CCC,DDD,EEE")]
        assets: Vec<String>,

        /// Days per asset.
        #[arg(long, default_value_t = 250)]
        days: usize,

        /// Master seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,
    },
}

/// Everything `scan` takes from the command line.
struct ScanArgs {
    config: Option<PathBuf>,
    assets: Option<Vec<String>>,
    days: Option<usize>,
    seed: Option<u64>,
    csv: Option<PathBuf>,
    detectors: Option<Vec<String>>,
    min_signals: usize,
    overlay: Option<(String, String)>,
    output_dir: Option<PathBuf>,
    sequential: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            config,
            assets,
            days,
            seed,
            csv,
            detectors,
            min_signals,
            asset,
            detector,
            output_dir,
            sequential,
        } => run_scan_cmd(ScanArgs {
            config,
            assets,
            days,
            seed,
            csv,
            detectors,
            min_signals,
            overlay: asset.zip(detector),
            output_dir,
            sequential,
        }),
        Commands::Detectors => run_detectors_cmd(),
        Commands::Generate {
            assets,
            days,
            seed,
            out,
        } => run_generate_cmd(assets, days, seed, out),
    }
}

/// Logs go to stderr so stdout stays a clean table. `RUST_LOG` overrides the
/// default `info` level.
fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_scan_config(args: &ScanArgs) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };

    if let Some(path) = &args.csv {
        config.data = DataConfig::Csv { path: path.clone() };
    } else if args.assets.is_some() || args.days.is_some() || args.seed.is_some() {
        let mut spec = match &config.data {
            DataConfig::Synthetic(spec) => spec.clone(),
            DataConfig::Csv { .. } => SyntheticSpec::default(),
        };
        if let Some(assets) = &args.assets {
            spec.assets = assets.clone();
        }
        if let Some(days) = args.days {
            spec.days = days;
        }
        if let Some(seed) = args.seed {
            spec.seed = seed;
        }
        config.data = DataConfig::Synthetic(spec);
    }

    if let Some(keys) = &args.detectors {
        config.detectors = keys
            .iter()
            .map(|k| DetectorConfig::from_key(k))
            .collect::<Result<Vec<_>, _>>()?;
    }

    if args.sequential {
        config.runner.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

/// Overlay target from `--asset` / `--detector`, checked before any scan work.
fn parse_overlay(args: &ScanArgs) -> Result<Option<(AssetId, DetectorKind)>> {
    args.overlay
        .as_ref()
        .map(|(asset, key)| {
            let kind = key.parse::<DetectorKind>().map_err(anyhow::Error::msg)?;
            Ok((AssetId::new(asset.as_str()), kind))
        })
        .transpose()
}

fn run_scan_cmd(args: ScanArgs) -> Result<()> {
    let overlay = parse_overlay(&args)?;
    let config = build_scan_config(&args)?;
    let outcome = run_scan(&config)?;

    for err in &outcome.errors {
        warn!("{err}");
    }

    println!();
    println!("=== Pattern Scan ===");
    println!("Assets:        {}", outcome.data.store.len());
    println!("Bars:          {}", outcome.data.store.bar_count());
    println!("Detectors:     {}", outcome.detectors.len());
    println!("Dataset hash:  {}", outcome.data.dataset_hash);
    if !outcome.errors.is_empty() {
        println!("Skipped:       {} asset(s)", outcome.errors.len());
    }
    println!();
    print!(
        "{}",
        view::summary_table(&outcome.summary, &outcome.detectors, args.min_signals)
    );

    if let Some((asset, kind)) = &overlay {
        println!();
        print!(
            "{}",
            view::overlay(&outcome.data.store, &outcome.table, asset, *kind)
        );
    }

    if let Some(dir) = &args.output_dir {
        let report = ScanReport::from_outcome(&outcome);
        save_artifacts(&report, &outcome.table, dir)?;
        println!();
        println!("Artifacts saved to: {}", dir.display());
    }

    Ok(())
}

fn run_detectors_cmd() -> Result<()> {
    println!("{:<20} {:<30} Defaults", "Key", "Label");
    println!("{}", "-".repeat(80));
    for kind in DetectorKind::ALL {
        let defaults = serde_json::to_value(DetectorConfig::default_for(kind))
            .context("failed to serialize detector defaults")?;
        let params = match defaults {
            serde_json::Value::Object(mut map) => {
                map.remove("type");
                map.into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            _ => String::new(),
        };
        println!("{:<20} {:<30} {}", kind.key(), kind.label(), params);
    }
    Ok(())
}

fn run_generate_cmd(assets: Vec<String>, days: usize, seed: u64, out: PathBuf) -> Result<()> {
    if assets.is_empty() || days == 0 {
        bail!("--assets and --days must be non-empty");
    }
    let spec = SyntheticSpec { assets, days, seed };
    let store = generate_store(&spec)?;
    let file = std::fs::File::create(&out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    write_csv(&store, file)?;
    println!(
        "Wrote {} bars for {} asset(s) to {}",
        store.bar_count(),
        store.len(),
        out.display()
    );
    Ok(())
}
