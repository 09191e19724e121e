// src/document/tooltip.rs

use crate::map::Coordinate;
use crate::utils::{format_distance, MeasurementUnit};

/// Distance readout attached to a vertex (or to the pointer while previewing).
///
/// Holds raw metres and degrees only; text is produced on demand so a unit
/// change never touches stored distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub anchor: Coordinate,
    /// Cumulative distance from the first vertex, metres.
    pub total: f64,
    /// Length of the segment ending here, metres.
    pub difference: f64,
    pub inbound_bearing: Option<f64>,
    pub outbound_bearing: Option<f64>,
}

impl Tooltip {
    /// Renders the readout, one line per item:
    ///
    /// ```text
    /// 1.23 km
    /// (+456.0 m)
    /// In: 90.0°  Out: --
    /// ```
    ///
    /// The increment line is omitted when it would read as zero.
    pub fn text(&self, unit: MeasurementUnit, show_bearings: bool) -> String {
        let mut text = format_distance(self.total, unit).to_string();

        let difference = format_distance(self.difference, unit);
        if difference.value.parse::<f64>().map_or(false, |v| v > 0.0) {
            text.push_str(&format!("\n(+{})", difference));
        }

        if show_bearings {
            text.push_str(&format!(
                "\nIn: {}  Out: {}",
                format_bearing(self.inbound_bearing),
                format_bearing(self.outbound_bearing)
            ));
        }
        text
    }
}

fn format_bearing(bearing: Option<f64>) -> String {
    match bearing {
        Some(degrees) => format!("{:.1}°", degrees),
        None => "--".to_string(),
    }
}
