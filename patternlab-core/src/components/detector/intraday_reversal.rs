//! Intraday reversal — wide range, close back near the open.
//!
//! range = (high - low) / open, net = (close - open) / open.
//! Fires when range > range_thresh, |net| < close_tol and range > min_range_mag.
//! The last condition overlaps the first under the defaults; both are kept.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntradayReversal {
    pub range_thresh: f64,
    pub close_tol: f64,
    pub min_range_mag: f64,
}

impl IntradayReversal {
    pub fn new(range_thresh: f64, close_tol: f64, min_range_mag: f64) -> Self {
        Self {
            range_thresh,
            close_tol,
            min_range_mag,
        }
    }
}

impl Default for IntradayReversal {
    fn default() -> Self {
        Self::new(0.015, 0.002, 0.01)
    }
}

impl Detector for IntradayReversal {
    fn kind(&self) -> DetectorKind {
        DetectorKind::IntradayReversal
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        Ok((0..cols.len())
            .map(|i| {
                let o = cols.open[i];
                let range = (cols.high[i] - cols.low[i]) / o;
                let net = (cols.close[i] - o) / o;
                range > self.range_thresh
                    && net.abs() < self.close_tol
                    && range > self.min_range_mag
            })
            .collect())
    }
}
