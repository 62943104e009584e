//! Volatility clustering — short-term volatility above its own average.
//!
//! vol = rolling sample std of close-to-close returns over `window`;
//! fires when vol > rolling mean of vol over `window`.
//! The return at bar 0 is undefined, so vol first exists at bar `window` and
//! its mean at bar `2 * window - 1`.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{greater, pct_change, rolling_mean, rolling_std};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityCluster {
    pub window: usize,
}

impl VolatilityCluster {
    pub fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for VolatilityCluster {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Detector for VolatilityCluster {
    fn kind(&self) -> DetectorKind {
        DetectorKind::VolatilityCluster
    }

    fn warmup_bars(&self) -> usize {
        (2 * self.window).saturating_sub(1)
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let returns = pct_change(&cols.close);
        let vol = rolling_std(&returns, self.window);
        let vol_mean = rolling_mean(&vol, self.window);
        Ok(greater(&vol, &vol_mean))
    }
}
