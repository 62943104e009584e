//! RSI extremes — oversold or overbought momentum.
//!
//! Fires when RSI(period) < oversold or RSI(period) > overbought, using the
//! simple-mean RSI from `indicators::rsi`. First defined RSI is at bar `period`.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::rsi;

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiExtreme {
    pub period: usize,
    pub epsilon: f64,
    pub oversold: f64,
    pub overbought: f64,
}

impl RsiExtreme {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

impl Default for RsiExtreme {
    fn default() -> Self {
        Self {
            period: 14,
            epsilon: 1e-9,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl Detector for RsiExtreme {
    fn kind(&self) -> DetectorKind {
        DetectorKind::RsiExtreme
    }

    fn warmup_bars(&self) -> usize {
        self.period
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        Ok(rsi(&cols.close, self.period, self.epsilon)
            .into_iter()
            .map(|v| v < self.oversold || v > self.overbought)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn monotonic_rise_is_overbought_once_window_fills() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let flags = RsiExtreme::default().detect(&make_bars(&closes)).unwrap();
        assert!(flags[..14].iter().all(|&f| !f));
        assert!(flags[14..].iter().all(|&f| f));
    }

    #[test]
    fn monotonic_fall_is_oversold() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let flags = RsiExtreme::default().detect(&make_bars(&closes)).unwrap();
        assert!(flags[14..].iter().all(|&f| f));
    }

    #[test]
    fn balanced_chop_is_neutral() {
        let closes: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        let flags = RsiExtreme::default().detect(&make_bars(&closes)).unwrap();
        assert!(flags.iter().all(|&f| !f));
    }

    #[test]
    fn custom_period_moves_warmup() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let det = RsiExtreme::new(3);
        let flags = det.detect(&make_bars(&closes)).unwrap();
        assert_eq!(det.warmup_bars(), 3);
        assert!(!flags[2]);
        assert!(flags[3]);
    }
}
