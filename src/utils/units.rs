// src/utils/units.rs
//! Display formatting for distances.
//!
//! Raw distances are always metres. Each unit system has a major unit with a
//! three-tier precision rule and a minor unit below one major unit:
//!
//! ```text
//! >= 1000 major   0 decimals   (no ambiguity with thousands separators)
//! >=  100 major   1 decimal
//! >=    1 major   2 decimals
//! <     1 major   minor unit, 1 decimal
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

pub const METRES_PER_KILOMETRE: f64 = 1000.0;
pub const METRES_PER_MILE: f64 = 1609.344;
pub const METRES_PER_NAUTICAL_MILE: f64 = 1852.0;
pub const METRES_PER_FOOT: f64 = 0.3048;

/// Unit system used for every tooltip. Global to a path set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    #[default]
    Metric,
    ImperialLand,
    ImperialNautical,
}

impl MeasurementUnit {
    /// Returns a user-friendly name for the unit system.
    pub fn name(&self) -> &'static str {
        match self {
            MeasurementUnit::Metric => "Metric",
            MeasurementUnit::ImperialLand => "Imperial (land)",
            MeasurementUnit::ImperialNautical => "Imperial (nautical)",
        }
    }

    /// Returns all unit systems, in toolbar order.
    pub fn all() -> &'static [MeasurementUnit] {
        &[
            MeasurementUnit::Metric,
            MeasurementUnit::ImperialLand,
            MeasurementUnit::ImperialNautical,
        ]
    }

    fn major(&self) -> (f64, &'static str) {
        match self {
            MeasurementUnit::Metric => (METRES_PER_KILOMETRE, "km"),
            MeasurementUnit::ImperialLand => (METRES_PER_MILE, "mi"),
            MeasurementUnit::ImperialNautical => (METRES_PER_NAUTICAL_MILE, "nm"),
        }
    }

    fn minor(&self) -> (f64, &'static str) {
        match self {
            MeasurementUnit::Metric => (1.0, "m"),
            MeasurementUnit::ImperialLand | MeasurementUnit::ImperialNautical => {
                (METRES_PER_FOOT, "ft")
            }
        }
    }
}

/// A distance ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDistance {
    pub value: String,
    pub symbol: &'static str,
}

impl fmt::Display for FormattedDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.symbol)
    }
}

/// Formats `metres` under `unit`.
///
/// Callers pass a finite, non-negative distance; anything else is a contract
/// violation and formats as whatever `f64` display produces.
pub fn format_distance(metres: f64, unit: MeasurementUnit) -> FormattedDistance {
    let (major, major_symbol) = unit.major();
    let (value, symbol) = if metres >= 1000.0 * major {
        (format!("{:.0}", metres / major), major_symbol)
    } else if metres >= 100.0 * major {
        (format!("{:.1}", metres / major), major_symbol)
    } else if metres >= major {
        (format!("{:.2}", metres / major), major_symbol)
    } else {
        let (minor, minor_symbol) = unit.minor();
        (format!("{:.1}", metres / minor), minor_symbol)
    };
    FormattedDistance { value, symbol }
}
