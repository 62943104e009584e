//! TOML scan configuration.
//!
//! ```toml
//! [data]
//! source = "synthetic"   # or "csv" with `path = "bars.csv"`
//! assets = ["AAA", "BBB"]
//! days = 250
//! seed = 7
//!
//! [runner]
//! parallel = true
//!
//! [[detectors]]
//! type = "breakout_trend"
//! window = 20
//! ```
//!
//! Every section is optional, and so is `source` inside `[data]` (it
//! defaults to `synthetic`). No `[[detectors]]` means the full battery with
//! default parameters.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use patternlab_core::{ConfigError as DetectorConfigError, DetectorConfig, DetectorSet};

use crate::data_loader::SyntheticSpec;
use crate::runner::RunnerOptions;

/// Errors from reading or validating a scan config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Detector(#[from] DetectorConfigError),
    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", try_from = "RawDataConfig")]
pub enum DataConfig {
    Synthetic(SyntheticSpec),
    Csv { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SourceKind {
    #[default]
    Synthetic,
    Csv,
}

/// `[data]` as written, before the source is resolved.
#[derive(Debug, Deserialize)]
struct RawDataConfig {
    #[serde(default)]
    source: SourceKind,
    path: Option<PathBuf>,
    #[serde(flatten)]
    synthetic: SyntheticSpec,
}

impl TryFrom<RawDataConfig> for DataConfig {
    type Error = String;

    fn try_from(raw: RawDataConfig) -> Result<Self, Self::Error> {
        match raw.source {
            SourceKind::Synthetic => Ok(DataConfig::Synthetic(raw.synthetic)),
            SourceKind::Csv => raw
                .path
                .map(|path| DataConfig::Csv { path })
                .ok_or_else(|| "missing field `path` for source = \"csv\"".to_string()),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig::Synthetic(SyntheticSpec::default())
    }
}

/// Top-level scan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub data: DataConfig,
    pub runner: RunnerOptions,
    pub detectors: Vec<DetectorConfig>,
}

impl ScanConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Detector list to run: the configured one, or all defaults.
    pub fn detector_configs(&self) -> Vec<DetectorConfig> {
        if self.detectors.is_empty() {
            DetectorConfig::all_defaults()
        } else {
            self.detectors.clone()
        }
    }

    /// Field checks plus a trial build of the detector set, so parameter
    /// errors surface before any data is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.data {
            DataConfig::Synthetic(spec) => {
                if spec.assets.is_empty() {
                    return Err(ConfigError::MissingField("data.assets"));
                }
                if spec.days == 0 {
                    return Err(ConfigError::MissingField("data.days"));
                }
            }
            DataConfig::Csv { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::MissingField("data.path"));
                }
            }
        }
        DetectorSet::from_configs(&self.detector_configs())?;
        Ok(())
    }
}
