//! Relative Strength Index (RSI), simple-mean variant.
//!
//! avg_gain / avg_loss are plain rolling means of the positive / negative
//! close deltas over `period` bars (no Wilder smoothing).
//! RSI = 100 - 100 / (1 + avg_gain / (avg_loss + epsilon))
//! First defined value at index `period` (delta at index 0 is undefined).

use super::returns::diff;
use super::rolling::rolling_mean;

pub fn rsi(closes: &[f64], period: usize, epsilon: f64) -> Vec<f64> {
    // The undefined first delta stays NaN rather than counting as a zero gain
    // and zero loss, so the window never averages over a made-up value.
    let deltas = diff(closes);
    let gains: Vec<f64> = deltas
        .iter()
        .map(|&d| if d.is_nan() { f64::NAN } else { d.max(0.0) })
        .collect();
    let losses: Vec<f64> = deltas
        .iter()
        .map(|&d| if d.is_nan() { f64::NAN } else { (-d).max(0.0) })
        .collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            let rs = g / (l + epsilon);
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    const EPS: f64 = 1e-9;

    #[test]
    fn rsi_all_gains_approaches_100() {
        let closes: Vec<f64> = (0..6).map(|i| 100.0 + i as f64).collect();
        let r = rsi(&closes, 3, EPS);
        assert!(r[..3].iter().all(|v| v.is_nan()));
        for &v in &r[3..] {
            assert!(v > 99.999, "expected ~100, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (0..6).map(|i| 105.0 - i as f64).collect();
        let r = rsi(&closes, 3, EPS);
        assert_approx(r[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_mixed_matches_hand_computation() {
        // deltas: +0.34, -0.25, -0.48 → gains 0.34, losses 0.73 over 3 bars
        let r = rsi(&[44.0, 44.34, 44.09, 43.61], 3, EPS);
        let expected = 100.0 - 100.0 / (1.0 + 0.34 / 0.73);
        assert_approx(r[3], expected, 1e-6);
    }

    #[test]
    fn rsi_flat_series_is_zero() {
        // no gains and no losses: RS = 0 / epsilon = 0
        let r = rsi(&[50.0; 5], 3, EPS);
        assert_approx(r[4], 0.0, 1e-12);
    }

    #[test]
    fn rsi_bounds() {
        let r = rsi(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0], 3, EPS);
        for (i, &v) in r.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }
}
