//! Gap and reverse — the session moves against its opening gap.
//!
//! gap = (open[i] - close[i-1]) / close[i-1], move = (close[i] - open[i]) / open[i].
//! Fires when |gap| > gap_thresh and sign(gap) != sign(move). A flat session
//! has sign 0 and therefore counts as a reversal. Bar 0 has no gap.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::same_sign;

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapReverse {
    pub gap_thresh: f64,
}

impl GapReverse {
    pub fn new(gap_thresh: f64) -> Self {
        Self { gap_thresh }
    }
}

impl Default for GapReverse {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Detector for GapReverse {
    fn kind(&self) -> DetectorKind {
        DetectorKind::GapReverse
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let mut flags = vec![false; cols.len()];
        for i in 1..cols.len() {
            let prev_close = cols.close[i - 1];
            let gap = (cols.open[i] - prev_close) / prev_close;
            let day_move = (cols.close[i] - cols.open[i]) / cols.open[i];
            flags[i] = gap.abs() > self.gap_thresh && !same_sign(gap, day_move);
        }
        Ok(flags)
    }
}
