//! Breakout trend — close clears the prior `window`-bar high.
//!
//! Fires when close[i] > max(high[i-window..i]). Today's own high is
//! excluded, so the first possible flag is at bar `window`.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{greater, rolling_max, shift};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutTrend {
    pub window: usize,
}

impl BreakoutTrend {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for BreakoutTrend {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Detector for BreakoutTrend {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BreakoutTrend
    }

    fn warmup_bars(&self) -> usize {
        self.window
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let prior_max = shift(&rolling_max(&cols.high, self.window), 1);
        Ok(greater(&cols.close, &prior_max))
    }
}
