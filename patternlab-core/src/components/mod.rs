//! Component traits — the detector battery.
//!
//! - Registry: the static list of detector identities (key + label)
//! - Detector: the trait and the thirteen concrete detectors
//! - Factory: serializable detector configs and the detector set builder

pub mod detector;
pub mod factory;
pub mod registry;

pub use detector::{Detector, InvalidInput};
pub use factory::{ConfigError, DetectorConfig, DetectorSet};
pub use registry::DetectorKind;
