//! Factory system — converts `DetectorConfig` into runtime trait objects.
//!
//! `DetectorConfig` is the serializable form of a detector with its
//! parameters (one tagged variant per registry entry). `build()` validates
//! the parameters and returns a boxed `Detector`. `DetectorSet` is the
//! ordered, duplicate-free list the runner applies to every asset.

use serde::{Deserialize, Serialize};

use super::detector::{
    BreakoutTrend, CloseNearExtreme, Detector, GapReverse, HlSpread, InsideDay, IntradayReversal,
    MeanReversion, OutsideDay, PriceAboveMa, RsiExtreme, StreakReversal, VolatilityCluster,
    VolumeSpike,
};
use super::registry::DetectorKind;

// ─── Error type ──────────────────────────────────────────────────────

/// Errors that can occur during detector construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{detector}: invalid parameter '{name}': {reason}")]
    InvalidParameter {
        detector: DetectorKind,
        name: &'static str,
        reason: String,
    },
    #[error("detector '{0}' listed more than once")]
    DuplicateDetector(DetectorKind),
    #[error("unknown detector: {0}")]
    UnknownDetector(String),
}

// ─── Config enum ─────────────────────────────────────────────────────

/// Serializable detector definition.
///
/// In TOML: `[[detectors]]` tables with `type = "<key>"` plus any parameter
/// overrides; omitted parameters take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DetectorConfig {
    IntradayReversal(IntradayReversal),
    StreakReversal(StreakReversal),
    MeanReversion(MeanReversion),
    CloseNearExtreme(CloseNearExtreme),
    InsideDay,
    OutsideDay,
    GapReverse(GapReverse),
    VolatilityCluster(VolatilityCluster),
    BreakoutTrend(BreakoutTrend),
    PriceAboveMa(PriceAboveMa),
    VolumeSpike(VolumeSpike),
    HlSpread(HlSpread),
    RsiExtreme(RsiExtreme),
}

impl DetectorConfig {
    pub fn kind(&self) -> DetectorKind {
        match self {
            DetectorConfig::IntradayReversal(_) => DetectorKind::IntradayReversal,
            DetectorConfig::StreakReversal(_) => DetectorKind::StreakReversal,
            DetectorConfig::MeanReversion(_) => DetectorKind::MeanReversion,
            DetectorConfig::CloseNearExtreme(_) => DetectorKind::CloseNearExtreme,
            DetectorConfig::InsideDay => DetectorKind::InsideDay,
            DetectorConfig::OutsideDay => DetectorKind::OutsideDay,
            DetectorConfig::GapReverse(_) => DetectorKind::GapReverse,
            DetectorConfig::VolatilityCluster(_) => DetectorKind::VolatilityCluster,
            DetectorConfig::BreakoutTrend(_) => DetectorKind::BreakoutTrend,
            DetectorConfig::PriceAboveMa(_) => DetectorKind::PriceAboveMa,
            DetectorConfig::VolumeSpike(_) => DetectorKind::VolumeSpike,
            DetectorConfig::HlSpread(_) => DetectorKind::HlSpread,
            DetectorConfig::RsiExtreme(_) => DetectorKind::RsiExtreme,
        }
    }

    /// Default parameters for a registry entry.
    pub fn default_for(kind: DetectorKind) -> Self {
        match kind {
            DetectorKind::IntradayReversal => Self::IntradayReversal(Default::default()),
            DetectorKind::StreakReversal => Self::StreakReversal(Default::default()),
            DetectorKind::MeanReversion => Self::MeanReversion(Default::default()),
            DetectorKind::CloseNearExtreme => Self::CloseNearExtreme(Default::default()),
            DetectorKind::InsideDay => Self::InsideDay,
            DetectorKind::OutsideDay => Self::OutsideDay,
            DetectorKind::GapReverse => Self::GapReverse(Default::default()),
            DetectorKind::VolatilityCluster => Self::VolatilityCluster(Default::default()),
            DetectorKind::BreakoutTrend => Self::BreakoutTrend(Default::default()),
            DetectorKind::PriceAboveMa => Self::PriceAboveMa(Default::default()),
            DetectorKind::VolumeSpike => Self::VolumeSpike(Default::default()),
            DetectorKind::HlSpread => Self::HlSpread(Default::default()),
            DetectorKind::RsiExtreme => Self::RsiExtreme(Default::default()),
        }
    }

    /// Default parameters for a registry key such as `"rsi_extreme"`.
    pub fn from_key(key: &str) -> Result<Self, ConfigError> {
        key.parse::<DetectorKind>()
            .map(Self::default_for)
            .map_err(|_| ConfigError::UnknownDetector(key.to_string()))
    }

    /// The full battery with default parameters, in registry order.
    pub fn all_defaults() -> Vec<Self> {
        DetectorKind::ALL.into_iter().map(Self::default_for).collect()
    }

    /// Check parameter ranges without building.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let kind = self.kind();
        match self {
            DetectorConfig::IntradayReversal(d) => {
                finite(kind, "range_thresh", d.range_thresh)?;
                finite(kind, "close_tol", d.close_tol)?;
                finite(kind, "min_range_mag", d.min_range_mag)
            }
            DetectorConfig::StreakReversal(d) => {
                at_least(kind, "min_streak_len", d.min_streak_len, 1)?;
                finite(kind, "min_avg_move", d.min_avg_move)
            }
            DetectorConfig::MeanReversion(d) => finite(kind, "threshold", d.threshold),
            DetectorConfig::CloseNearExtreme(d) => finite(kind, "thresh", d.thresh),
            DetectorConfig::InsideDay | DetectorConfig::OutsideDay => Ok(()),
            DetectorConfig::GapReverse(d) => finite(kind, "gap_thresh", d.gap_thresh),
            // sample std needs two points
            DetectorConfig::VolatilityCluster(d) => at_least(kind, "window", d.window, 2),
            DetectorConfig::BreakoutTrend(d) => at_least(kind, "window", d.window, 1),
            DetectorConfig::PriceAboveMa(d) => at_least(kind, "window", d.window, 1),
            DetectorConfig::VolumeSpike(d) => {
                finite(kind, "threshold", d.threshold)?;
                at_least(kind, "mean_window", d.mean_window, 1)
            }
            DetectorConfig::HlSpread(d) => at_least(kind, "window", d.window, 1),
            DetectorConfig::RsiExtreme(d) => {
                at_least(kind, "period", d.period, 1)?;
                finite(kind, "epsilon", d.epsilon)?;
                finite(kind, "oversold", d.oversold)?;
                finite(kind, "overbought", d.overbought)?;
                if d.oversold > d.overbought {
                    return Err(ConfigError::InvalidParameter {
                        detector: kind,
                        name: "oversold",
                        reason: format!(
                            "oversold {} is above overbought {}",
                            d.oversold, d.overbought
                        ),
                    });
                }
                Ok(())
            }
        }
    }

    /// Validate and build the runtime detector.
    pub fn build(&self) -> Result<Box<dyn Detector>, ConfigError> {
        self.validate()?;
        Ok(match self {
            DetectorConfig::IntradayReversal(d) => Box::new(d.clone()),
            DetectorConfig::StreakReversal(d) => Box::new(d.clone()),
            DetectorConfig::MeanReversion(d) => Box::new(d.clone()),
            DetectorConfig::CloseNearExtreme(d) => Box::new(d.clone()),
            DetectorConfig::InsideDay => Box::new(InsideDay),
            DetectorConfig::OutsideDay => Box::new(OutsideDay),
            DetectorConfig::GapReverse(d) => Box::new(d.clone()),
            DetectorConfig::VolatilityCluster(d) => Box::new(d.clone()),
            DetectorConfig::BreakoutTrend(d) => Box::new(d.clone()),
            DetectorConfig::PriceAboveMa(d) => Box::new(d.clone()),
            DetectorConfig::VolumeSpike(d) => Box::new(d.clone()),
            DetectorConfig::HlSpread(d) => Box::new(d.clone()),
            DetectorConfig::RsiExtreme(d) => Box::new(d.clone()),
        })
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn finite(detector: DetectorKind, name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            detector,
            name,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn at_least(
    detector: DetectorKind,
    name: &'static str,
    value: usize,
    min: usize,
) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            detector,
            name,
            reason: format!("must be >= {min}, got {value}"),
        })
    }
}

// ─── Detector set ────────────────────────────────────────────────────

/// Ordered list of built detectors, at most one per kind.
#[derive(Debug)]
pub struct DetectorSet {
    detectors: Vec<Box<dyn Detector>>,
}

impl DetectorSet {
    /// Build every config in order. Fails on the first invalid config or on a
    /// kind that appears twice (flag columns are keyed by kind).
    pub fn from_configs(configs: &[DetectorConfig]) -> Result<Self, ConfigError> {
        let mut detectors: Vec<Box<dyn Detector>> = Vec::with_capacity(configs.len());
        for config in configs {
            if detectors.iter().any(|d| d.kind() == config.kind()) {
                return Err(ConfigError::DuplicateDetector(config.kind()));
            }
            detectors.push(config.build()?);
        }
        Ok(Self { detectors })
    }

    /// All thirteen detectors with default parameters.
    pub fn all_defaults() -> Self {
        Self {
            detectors: DetectorKind::ALL
                .into_iter()
                .map(default_detector)
                .collect(),
        }
    }

    /// Build a set from kind keys (e.g. CLI arguments), using defaults.
    pub fn from_keys<S: AsRef<str>>(keys: &[S]) -> Result<Self, ConfigError> {
        let configs = keys
            .iter()
            .map(|k| DetectorConfig::from_key(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_configs(&configs)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Detector> {
        self.detectors.iter().map(|d| d.as_ref())
    }

    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

fn default_detector(kind: DetectorKind) -> Box<dyn Detector> {
    match kind {
        DetectorKind::IntradayReversal => Box::new(IntradayReversal::default()),
        DetectorKind::StreakReversal => Box::new(StreakReversal::default()),
        DetectorKind::MeanReversion => Box::new(MeanReversion::default()),
        DetectorKind::CloseNearExtreme => Box::new(CloseNearExtreme::default()),
        DetectorKind::InsideDay => Box::new(InsideDay),
        DetectorKind::OutsideDay => Box::new(OutsideDay),
        DetectorKind::GapReverse => Box::new(GapReverse::default()),
        DetectorKind::VolatilityCluster => Box::new(VolatilityCluster::default()),
        DetectorKind::BreakoutTrend => Box::new(BreakoutTrend::default()),
        DetectorKind::PriceAboveMa => Box::new(PriceAboveMa::default()),
        DetectorKind::VolumeSpike => Box::new(VolumeSpike::default()),
        DetectorKind::HlSpread => Box::new(HlSpread::default()),
        DetectorKind::RsiExtreme => Box::new(RsiExtreme::default()),
    }
}
