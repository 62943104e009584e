//! Pattern detectors — one boolean flag per bar.
//!
//! A detector is a pure function of a single asset's bars and its own
//! parameters. It never sees another asset, never mutates its input, and
//! returns exactly one flag per input bar. Leading bars without enough
//! history for a rolling statistic always get `false`.

pub mod breakout_trend;
pub mod close_near_extreme;
pub mod gap_reverse;
pub mod hl_spread;
pub mod inside_outside;
pub mod intraday_reversal;
pub mod mean_reversion;
pub mod price_above_ma;
pub mod rsi_extreme;
pub mod streak_reversal;
pub mod volatility_cluster;
pub mod volume_spike;

use thiserror::Error;

use crate::domain::{Bar, PriceField};

use super::registry::DetectorKind;

pub use breakout_trend::BreakoutTrend;
pub use close_near_extreme::CloseNearExtreme;
pub use gap_reverse::GapReverse;
pub use hl_spread::HlSpread;
pub use inside_outside::{InsideDay, OutsideDay};
pub use intraday_reversal::IntradayReversal;
pub use mean_reversion::MeanReversion;
pub use price_above_ma::PriceAboveMa;
pub use rsi_extreme::RsiExtreme;
pub use streak_reversal::StreakReversal;
pub use volatility_cluster::VolatilityCluster;
pub use volume_spike::VolumeSpike;

/// Malformed or degenerate input series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("empty bar series")]
    EmptySeries,

    #[error("non-positive {field} {value} at index {index} (day {day})")]
    NonPositivePrice {
        index: usize,
        day: u32,
        field: PriceField,
        value: f64,
    },

    #[error("invalid volume {value} at index {index} (day {day})")]
    InvalidVolume { index: usize, day: u32, value: f64 },

    #[error("volume supplied for {supplied} of {total} bars; supply all or none")]
    PartialVolume { supplied: usize, total: usize },
}

/// Trait for detectors.
///
/// `detect` returns a `Vec<bool>` of the same length as `bars`. The first
/// `warmup_bars()` entries are always `false`.
pub trait Detector: Send + Sync + std::fmt::Debug {
    /// Registry identity of this detector.
    fn kind(&self) -> DetectorKind;

    /// Machine key used as the flag column name.
    fn name(&self) -> &'static str {
        self.kind().key()
    }

    /// Number of leading bars that can never be flagged.
    fn warmup_bars(&self) -> usize;

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput>;
}

/// Column view of a validated bar slice.
#[derive(Debug, Clone)]
pub struct Columns {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

impl Columns {
    /// Validate bars and split them into price columns.
    ///
    /// Rejects an empty slice and any non-finite or non-positive price. This
    /// also covers the zero-close denominators of the return-based detectors.
    pub fn checked(bars: &[Bar]) -> Result<Self, InvalidInput> {
        validate_bars(bars)?;
        Ok(Self {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }
}

pub fn validate_bars(bars: &[Bar]) -> Result<(), InvalidInput> {
    if bars.is_empty() {
        return Err(InvalidInput::EmptySeries);
    }
    for (index, bar) in bars.iter().enumerate() {
        if let Some((field, value)) = bar.first_bad_price() {
            return Err(InvalidInput::NonPositivePrice {
                index,
                day: bar.day,
                field,
                value,
            });
        }
    }
    Ok(())
}
