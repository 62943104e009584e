//! Price above its simple moving average.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{greater, rolling_mean};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceAboveMa {
    pub window: usize,
}

impl PriceAboveMa {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for PriceAboveMa {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Detector for PriceAboveMa {
    fn kind(&self) -> DetectorKind {
        DetectorKind::PriceAboveMa
    }

    fn warmup_bars(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let ma = rolling_mean(&cols.close, self.window);
        Ok(greater(&cols.close, &ma))
    }
}
