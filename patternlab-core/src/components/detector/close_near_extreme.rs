//! Close near the day's extreme.
//!
//! Fires when (high - close) / high < thresh or (close - low) / low < thresh.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseNearExtreme {
    pub thresh: f64,
}

impl CloseNearExtreme {
    pub fn new(thresh: f64) -> Self {
        Self { thresh }
    }
}

impl Default for CloseNearExtreme {
    fn default() -> Self {
        Self::new(0.02)
    }
}

impl Detector for CloseNearExtreme {
    fn kind(&self) -> DetectorKind {
        DetectorKind::CloseNearExtreme
    }

    fn warmup_bars(&self) -> usize {
        0
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        Ok((0..cols.len())
            .map(|i| {
                let (h, l, c) = (cols.high[i], cols.low[i], cols.close[i]);
                let dist_to_high = (h - c) / h;
                let dist_to_low = (c - l) / l;
                dist_to_high < self.thresh || dist_to_low < self.thresh
            })
            .collect())
    }
}
