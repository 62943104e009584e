//! Trailing-window statistics over a single series.
//!
//! The value at index `i` covers `xs[i+1-window..=i]`. It is defined only when
//! the full window exists and holds no NaN; otherwise it is NaN. Callers pass
//! one asset's series at a time, so a window can never straddle two assets.

/// Rolling arithmetic mean.
///
/// Each window is summed from scratch, so a value depends only on the bars
/// inside its window and never on rounding carried over from earlier bars.
pub fn rolling_mean(xs: &[f64], window: usize) -> Vec<f64> {
    let n = xs.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &xs[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }

    out
}

/// Rolling sample standard deviation (n - 1 denominator).
///
/// A window of one has no sample deviation and yields NaN everywhere.
pub fn rolling_std(xs: &[f64], window: usize) -> Vec<f64> {
    let n = xs.len();
    let mut out = vec![f64::NAN; n];
    if window < 2 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let slice = &xs[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let ss: f64 = slice.iter().map(|v| (v - mean).powi(2)).sum();
        out[i] = (ss / (window - 1) as f64).sqrt();
    }

    out
}

/// Rolling maximum.
pub fn rolling_max(xs: &[f64], window: usize) -> Vec<f64> {
    let n = xs.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }

    for i in (window - 1)..n {
        let mut max_val = f64::NEG_INFINITY;
        let mut has_nan = false;
        for &v in &xs[i + 1 - window..=i] {
            if v.is_nan() {
                has_nan = true;
                break;
            }
            if v > max_val {
                max_val = v;
            }
        }
        out[i] = if has_nan { f64::NAN } else { max_val };
    }

    out
}

/// `a[i] > b[i]`, false wherever either side is undefined.
pub fn greater(a: &[f64], b: &[f64]) -> Vec<bool> {
    a.iter().zip(b).map(|(&x, &y)| x > y).collect()
}
