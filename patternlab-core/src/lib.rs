//! PatternLab Core — bar series domain types and the signal detector battery.
//!
//! This crate contains the algorithmic heart of the scanner:
//! - Domain types (bars, per-asset series, the multi-asset bar store)
//! - Series primitives (returns, rolling mean / std / max, RSI)
//! - The `Detector` trait and thirteen pattern detectors
//! - A static detector registry and a config-driven factory
//!
//! Every detector is a pure function of one asset's bars. Nothing here holds
//! global state; the runner crate applies the battery across assets.

pub mod components;
pub mod domain;
pub mod indicators;

pub use components::{ConfigError, Detector, DetectorConfig, DetectorKind, DetectorSet, InvalidInput};
pub use domain::{AssetId, AssetSeries, Bar, BarStore, SeriesError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync so the runner can fan
    /// detectors out across threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::AssetSeries>();
        require_sync::<domain::AssetSeries>();
        require_send::<domain::BarStore>();
        require_sync::<domain::BarStore>();
        require_send::<DetectorKind>();
        require_sync::<DetectorKind>();
        require_send::<DetectorConfig>();
        require_sync::<DetectorConfig>();
        require_send::<DetectorSet>();
        require_sync::<DetectorSet>();
        require_send::<InvalidInput>();
        require_sync::<InvalidInput>();
    }

    /// Architecture contract: a detector sees one asset's bars and nothing else.
    ///
    /// `detect()` takes `&[Bar]` only. There is no store, no other series and
    /// no mutable state in the signature, so cross-asset windows are not
    /// expressible.
    #[test]
    fn detector_trait_takes_a_single_bar_slice() {
        fn _check_trait_object_builds(
            det: &dyn Detector,
            bars: &[Bar],
        ) -> Result<Vec<bool>, InvalidInput> {
            det.detect(bars)
        }
    }
}
