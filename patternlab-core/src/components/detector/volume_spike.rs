//! Volume spike — volume well above its short rolling mean.
//!
//! Fires when volume > threshold * rolling mean of volume over `mean_window`.
//!
//! Volume comes from the bars when every bar carries one. When no bar does,
//! a synthetic series is drawn from Normal(1_000_000, 200_000) with an RNG
//! seeded from `seed`, so every call produces the same series. That fallback
//! exists for demo and test data only; flags computed from it say nothing
//! about real trading activity.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::registry::DetectorKind;
use crate::domain::Bar;
use crate::indicators::{greater, rolling_mean};

use super::{validate_bars, Detector, InvalidInput};

pub const SYNTHETIC_VOLUME_MEAN: f64 = 1_000_000.0;
pub const SYNTHETIC_VOLUME_STD: f64 = 200_000.0;
pub const DEFAULT_VOLUME_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSpike {
    pub threshold: f64,
    pub mean_window: usize,
    /// Seed for the synthetic fallback series.
    pub seed: u64,
}

impl VolumeSpike {
    pub fn new(threshold: f64, mean_window: usize) -> Self {
        Self {
            threshold,
            mean_window,
            seed: DEFAULT_VOLUME_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Volume series the detector will use for `bars`.
    pub fn volumes(&self, bars: &[Bar]) -> Result<Vec<f64>, InvalidInput> {
        let supplied = bars.iter().filter(|b| b.volume.is_some()).count();
        if supplied == 0 {
            debug!(
                bars = bars.len(),
                seed = self.seed,
                "no volume supplied, using synthetic demo volume"
            );
            return Ok(synthetic_volume(bars.len(), self.seed));
        }
        if supplied < bars.len() {
            return Err(InvalidInput::PartialVolume {
                supplied,
                total: bars.len(),
            });
        }

        bars.iter()
            .enumerate()
            .map(|(index, bar)| match bar.volume {
                Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
                other => Err(InvalidInput::InvalidVolume {
                    index,
                    day: bar.day,
                    value: other.unwrap_or(f64::NAN),
                }),
            })
            .collect()
    }
}

impl Default for VolumeSpike {
    fn default() -> Self {
        Self::new(2.0, 5)
    }
}

/// Deterministic Normal(1e6, 2e5) volume series, one draw per bar.
pub fn synthetic_volume(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            SYNTHETIC_VOLUME_MEAN + SYNTHETIC_VOLUME_STD * z
        })
        .collect()
}

impl Detector for VolumeSpike {
    fn kind(&self) -> DetectorKind {
        DetectorKind::VolumeSpike
    }

    fn warmup_bars(&self) -> usize {
        self.mean_window.saturating_sub(1)
    }

    fn detect(&self, bars: &[Bar]) -> Result<Vec<bool>, InvalidInput> {
        validate_bars(bars)?;
        let volume = self.volumes(bars)?;
        let threshold_level: Vec<f64> = rolling_mean(&volume, self.mean_window)
            .into_iter()
            .map(|m| self.threshold * m)
            .collect();
        Ok(greater(&volume, &threshold_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn bars_with_volume(volumes: &[f64]) -> Vec<Bar> {
        let closes = vec![100.0; volumes.len()];
        make_bars(&closes)
            .into_iter()
            .zip(volumes)
            .map(|(b, &v)| b.with_volume(v))
            .collect()
    }

    #[test]
    fn fires_on_spike() {
        let mut volumes = vec![1000.0; 10];
        volumes[6] = 5000.0;
        let flags = VolumeSpike::default().detect(&bars_with_volume(&volumes)).unwrap();
        let set: Vec<usize> = (0..flags.len()).filter(|&i| flags[i]).collect();
        assert_eq!(set, vec![6]);
    }

    #[test]
    fn spike_inside_warmup_is_not_flagged() {
        let mut volumes = vec![1000.0; 10];
        volumes[2] = 50_000.0;
        let flags = VolumeSpike::default().detect(&bars_with_volume(&volumes)).unwrap();
        assert!(flags[..4].iter().all(|&f| !f));
    }

    #[test]
    fn synthetic_fallback_is_deterministic() {
        let bars = make_bars(&[100.0; 30]);
        let det = VolumeSpike::default();
        let a = det.detect(&bars).unwrap();
        let b = det.detect(&bars).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
        assert_eq!(det.volumes(&bars).unwrap(), synthetic_volume(30, DEFAULT_VOLUME_SEED));
    }

    #[test]
    fn synthetic_volume_has_expected_moments() {
        let v = synthetic_volume(5000, 7);
        let mean = v.iter().sum::<f64>() / v.len() as f64;
        let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (v.len() - 1) as f64;
        assert!((mean - SYNTHETIC_VOLUME_MEAN).abs() < 20_000.0, "mean {mean}");
        assert!((var.sqrt() - SYNTHETIC_VOLUME_STD).abs() < 20_000.0, "std {}", var.sqrt());
    }

    #[test]
    fn different_seed_different_series() {
        assert_ne!(synthetic_volume(10, 1), synthetic_volume(10, 2));
    }

    #[test]
    fn partial_volume_is_rejected() {
        let mut bars = bars_with_volume(&[1000.0, 1000.0, 1000.0]);
        bars[1].volume = None;
        assert_eq!(
            VolumeSpike::default().detect(&bars).unwrap_err(),
            InvalidInput::PartialVolume {
                supplied: 2,
                total: 3
            }
        );
    }

    #[test]
    fn negative_volume_is_rejected() {
        let bars = bars_with_volume(&[1000.0, -5.0]);
        assert!(matches!(
            VolumeSpike::default().detect(&bars),
            Err(InvalidInput::InvalidVolume { index: 1, .. })
        ));
    }
}
