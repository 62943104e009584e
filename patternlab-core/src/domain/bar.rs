//! Bar — the fundamental market data unit.

use serde::{Deserialize, Serialize};

use super::AssetId;

/// Daily OHLC bar for a single asset.
///
/// `day` is an ordinal: within one asset it starts anywhere and increases by
/// exactly one per bar. Volume is optional; detectors that need it fall back
/// to a synthetic series when it is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub asset: AssetId,
    pub day: u32,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Which price field of a bar a check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
        };
        f.write_str(s)
    }
}

impl Bar {
    pub fn new(
        asset: impl Into<AssetId>,
        day: u32,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        Self {
            asset: asset.into(),
            day,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// The four price fields in O/H/L/C order.
    pub fn prices(&self) -> [(PriceField, f64); 4] {
        [
            (PriceField::Open, self.open),
            (PriceField::High, self.high),
            (PriceField::Low, self.low),
            (PriceField::Close, self.close),
        ]
    }

    /// First price field that is non-finite or not strictly positive.
    pub fn first_bad_price(&self) -> Option<(PriceField, f64)> {
        self.prices()
            .into_iter()
            .find(|&(_, v)| !v.is_finite() || v <= 0.0)
    }

    /// OHLC sanity: high bounds everything from above, low from below.
    ///
    /// Detectors do not require this; it is reported by the data sources.
    pub fn is_sane(&self) -> bool {
        self.first_bad_price().is_none()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new("AAA", 0, 100.0, 105.0, 98.0, 103.0)
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_non_positive_price() {
        let mut bar = sample_bar();
        bar.low = 0.0;
        assert_eq!(bar.first_bad_price(), Some((PriceField::Low, 0.0)));
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_nan_price() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(matches!(bar.first_bad_price(), Some((PriceField::Open, _))));
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn volume_is_omitted_from_json_when_missing() {
        let json = serde_json::to_string(&sample_bar()).unwrap();
        assert!(!json.contains("volume"));
        let with_vol = serde_json::to_string(&sample_bar().with_volume(5.0)).unwrap();
        let back: Bar = serde_json::from_str(&with_vol).unwrap();
        assert_eq!(back.volume, Some(5.0));
    }
}
