//! Inside and outside days — containment relative to the previous bar.
//!
//! Inside: high[i] <= high[i-1] and low[i] >= low[i-1].
//! Outside: high[i] >= high[i-1] and low[i] <= low[i-1].
//! Bar 0 has no predecessor and is never flagged. Both fire together only
//! when high and low equal the previous bar's exactly.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsideDay;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutsideDay;

fn compare_with_previous(
    bars: &[Bar],
    rule: impl Fn(f64, f64, f64, f64) -> bool,
) -> Result<Vec<bool>, InvalidInput> {
    let cols = Columns::checked(bars)?;
    let mut flags = vec![false; cols.len()];
    for i in 1..cols.len() {
        flags[i] = rule(cols.high[i], cols.low[i], cols.high[i - 1], cols.low[i - 1]);
    }
    Ok(flags)
}

impl Detector for InsideDay {
    fn kind(&self) -> DetectorKind {
        DetectorKind::InsideDay
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        compare_with_previous(bars, |h, l, ph, pl| h <= ph && l >= pl)
    }
}

impl Detector for OutsideDay {
    fn kind(&self) -> DetectorKind {
        DetectorKind::OutsideDay
    }

    fn warmup_bars(&self) -> usize {
        1
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        compare_with_previous(bars, |h, l, ph, pl| h >= ph && l <= pl)
    }
}
