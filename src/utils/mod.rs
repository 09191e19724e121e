// src/utils/mod.rs
pub mod geometry;
pub mod units;
pub mod util;

pub use units::{format_distance, FormattedDistance, MeasurementUnit};
