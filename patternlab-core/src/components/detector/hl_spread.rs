//! High-low spread — a bar's range relative to its recent average range.
//!
//! hl = (high - low) / close; fires when hl > rolling mean of hl over `window`.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{greater, rolling_mean};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HlSpread {
    pub window: usize,
}

impl HlSpread {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for HlSpread {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Detector for HlSpread {
    fn kind(&self) -> DetectorKind {
        DetectorKind::HlSpread
    }

    fn warmup_bars(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let hl: Vec<f64> = (0..cols.len())
            .map(|i| (cols.high[i] - cols.low[i]) / cols.close[i])
            .collect();
        let hl_mean = rolling_mean(&hl, self.window);
        Ok(greater(&hl, &hl_mean))
    }
}
