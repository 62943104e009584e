//! Bar-to-bar derived series: percent change, first difference, shift, sign.
//!
//! Index 0 has no predecessor, so every derived series starts with NaN.

/// Percent change: `r[i] = (x[i] - x[i-1]) / x[i-1]`, `r[0] = NaN`.
pub fn pct_change(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 1..xs.len() {
        out[i] = (xs[i] - xs[i - 1]) / xs[i - 1];
    }
    out
}

/// First difference: `d[i] = x[i] - x[i-1]`, `d[0] = NaN`.
pub fn diff(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 1..xs.len() {
        out[i] = xs[i] - xs[i - 1];
    }
    out
}

/// Lag a series by `k` bars: `out[i] = xs[i - k]`, NaN where `i < k`.
pub fn shift(xs: &[f64], k: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in k..xs.len() {
        out[i] = xs[i - k];
    }
    out
}

/// Sign as -1, 0 or +1. NaN stays NaN.
pub fn sign(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Sign comparison with the NaN rule: NaN never equals anything.
pub fn same_sign(a: f64, b: f64) -> bool {
    sign(a) == sign(b)
}
