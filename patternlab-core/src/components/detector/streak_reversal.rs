//! Streak reversal — a run of same-direction closes that breaks.
//!
//! With r = percent change of close, tracks the run of consecutive returns
//! sharing one nonzero sign. When the sign breaks at bar i (including a zero
//! return on either side), the run ending at i-1 is evaluated: if it is at
//! least `min_streak_len` long and its mean return exceeds `min_avg_move` in
//! magnitude, bar i (the first bar of the new direction) is flagged. The run
//! then restarts at length 1.

use serde::{Deserialize, Serialize};

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{pct_change, sign};

use super::{Columns, Detector, InvalidInput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreakReversal {
    pub min_streak_len: usize,
    pub min_avg_move: f64,
}

impl StreakReversal {
    pub fn new(min_streak_len: usize, min_avg_move: f64) -> Self {
        Self {
            min_streak_len,
            min_avg_move,
        }
    }
}

impl Default for StreakReversal {
    fn default() -> Self {
        Self::new(3, 0.002)
    }
}

impl Detector for StreakReversal {
    fn kind(&self) -> DetectorKind {
        DetectorKind::StreakReversal
    }

    /// A run of length L starts at r[1] at the earliest and is evaluated one
    /// bar after it ends.
    fn warmup_bars(&self) -> usize {
        self.min_streak_len.max(1) + 1
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        let cols = Columns::checked(bars)?;
        let n = cols.len();
        let r = pct_change(&cols.close);
        let mut flags = vec![false; n];

        // run holds r[i-run..i]; starts with r[1]
        let mut run = 1usize;
        for i in 2..n {
            let s = sign(r[i]);
            if s != 0.0 && s == sign(r[i - 1]) {
                run += 1;
                continue;
            }

            if run >= self.min_streak_len {
                let mean = r[i - run..i].iter().sum::<f64>() / run as f64;
                if mean.abs() > self.min_avg_move {
                    flags[i] = true;
                }
            }
            run = 1;
        }

        Ok(flags)
    }
}
