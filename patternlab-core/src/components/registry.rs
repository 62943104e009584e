//! Static detector registry.
//!
//! Every detector has a fixed identity carrying a machine key (used for flag
//! columns, config files and CLI arguments) and a separate display label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of one of the thirteen detectors.
///
/// Declaration order is the canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    IntradayReversal,
    StreakReversal,
    MeanReversion,
    CloseNearExtreme,
    InsideDay,
    OutsideDay,
    GapReverse,
    VolatilityCluster,
    BreakoutTrend,
    PriceAboveMa,
    VolumeSpike,
    HlSpread,
    RsiExtreme,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 13] = [
        DetectorKind::IntradayReversal,
        DetectorKind::StreakReversal,
        DetectorKind::MeanReversion,
        DetectorKind::CloseNearExtreme,
        DetectorKind::InsideDay,
        DetectorKind::OutsideDay,
        DetectorKind::GapReverse,
        DetectorKind::VolatilityCluster,
        DetectorKind::BreakoutTrend,
        DetectorKind::PriceAboveMa,
        DetectorKind::VolumeSpike,
        DetectorKind::HlSpread,
        DetectorKind::RsiExtreme,
    ];

    pub fn key(self) -> &'static str {
        match self {
            DetectorKind::IntradayReversal => "intraday_reversal",
            DetectorKind::StreakReversal => "streak_reversal",
            DetectorKind::MeanReversion => "mean_reversion",
            DetectorKind::CloseNearExtreme => "close_near_extreme",
            DetectorKind::InsideDay => "inside_day",
            DetectorKind::OutsideDay => "outside_day",
            DetectorKind::GapReverse => "gap_reverse",
            DetectorKind::VolatilityCluster => "volatility_cluster",
            DetectorKind::BreakoutTrend => "breakout_trend",
            DetectorKind::PriceAboveMa => "price_above_ma",
            DetectorKind::VolumeSpike => "volume_spike",
            DetectorKind::HlSpread => "hl_spread",
            DetectorKind::RsiExtreme => "rsi_extreme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetectorKind::IntradayReversal => "Intraday Reversal",
            DetectorKind::StreakReversal => "Streak Reversal",
            DetectorKind::MeanReversion => "Mean Reversion After Extreme",
            DetectorKind::CloseNearExtreme => "Close Near Extreme",
            DetectorKind::InsideDay => "Inside Day",
            DetectorKind::OutsideDay => "Outside Day",
            DetectorKind::GapReverse => "Gap and Reverse",
            DetectorKind::VolatilityCluster => "Volatility Clustering",
            DetectorKind::BreakoutTrend => "Breakout Trend",
            DetectorKind::PriceAboveMa => "Price Above MA",
            DetectorKind::VolumeSpike => "Volume Spike",
            DetectorKind::HlSpread => "High-Low Spread",
            DetectorKind::RsiExtreme => "RSI Extremes",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectorKind::ALL
            .into_iter()
            .find(|k| k.key() == s)
            .ok_or_else(|| format!("unknown detector '{s}'"))
    }
}
