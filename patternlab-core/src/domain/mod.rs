//! Domain types for PatternLab

pub mod bar;
pub mod ids;
pub mod series;

pub use bar::{Bar, PriceField};
pub use ids::AssetId;
pub use series::{AssetSeries, BarStore, SeriesError};
