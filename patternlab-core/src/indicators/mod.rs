//! Series primitives shared by the detectors.
//!
//! Everything here is a pure function over `&[f64]` that returns a series of
//! the same length, using NaN for "undefined". Comparing against NaN is
//! false, which is how detectors turn missing warmup history into a 0 flag.

pub mod returns;
pub mod rolling;
pub mod rsi;

pub use returns::{diff, pct_change, same_sign, shift, sign};
pub use rolling::{greater, rolling_max, rolling_mean, rolling_std};
pub use rsi::rsi;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLC: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, no volume.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new("TEST", i as u32, open, high, low, close)
        })
        .collect()
}

/// Build bars from explicit O/H/L/C columns.
#[cfg(test)]
pub fn make_ohlc(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    (0..close.len())
        .map(|i| Bar::new("TEST", i as u32, open[i], high[i], low[i], close[i]))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
