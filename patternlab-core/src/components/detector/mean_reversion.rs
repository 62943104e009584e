//! Mean reversion after an extreme move.
//!
//! For every interior bar i (1 <= i <= n-2) with |r[i]| > threshold, the next
//! bar is flagged when its return has a different sign. A zero return counts
//! as a different sign. Bars 0 and n-1 are never the triggering bar.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{pct_change, same_sign};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversion {
    pub threshold: f64,
}

impl MeanReversion {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Default for MeanReversion {
    fn default() -> Self {
        Self::new(0.02)
    }
}

impl Detector for MeanReversion {
    fn kind(&self) -> DetectorKind {
        DetectorKind::MeanReversion
    }

    fn warmup_bars(&self) -> usize {
        2
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let n = cols.len();
        let r = pct_change(&cols.close);
        let mut flags = vec![false; n];

        for i in 1..n.saturating_sub(1) {
            if r[i].abs() > self.threshold && !same_sign(r[i], r[i + 1]) {
                flags[i + 1] = true;
            }
        }

        Ok(flags)
    }
}
