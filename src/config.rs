// src/config.rs
//! # Measurement Options
//!
//! Everything a host can configure, loadable from JSON. Every field has a
//! default, so a file only needs the keys it changes:
//!
//! ```json
//! { "unit": "imperial_nautical", "show_bearings": true }
//! ```

use crate::error::{MeasureError, Result};
use crate::map::{VertexRole, DEFAULT_ARC_POINTS};
use crate::utils::MeasurementUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Stroke settings for polylines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    pub color: String,
    pub weight: f32,
    pub dashed: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: "#006".to_string(),
            weight: 2.0,
            dashed: false,
        }
    }
}

/// Style record for vertex circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleStyle {
    pub color: String,
    pub weight: f32,
    pub fill_color: String,
    pub fill_opacity: f32,
    pub radius: f32,
}

impl CircleStyle {
    fn filled(fill_color: &str) -> Self {
        Self {
            fill_color: fill_color.to_string(),
            ..Self::default()
        }
    }
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: "#000".to_string(),
            weight: 1.0,
            fill_color: "#ff0".to_string(),
            fill_opacity: 1.0,
            radius: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowStyle {
    pub color: String,
    pub size: f32,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self {
            color: "#006".to_string(),
            size: 8.0,
        }
    }
}

/// Options read by the measurement controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureOptions {
    pub unit: MeasurementUnit,
    pub show_bearings: bool,
    pub show_arrows: bool,
    /// Remove all measurements when measuring is switched off.
    pub clear_measurements_on_stop: bool,
    /// Points sampled along each great-circle arc.
    pub arc_points: usize,
    /// Rubber-band from the last vertex to the pointer.
    pub temp_line: LineStyle,
    /// Committed segments.
    pub fixed_line: LineStyle,
    pub arrow: ArrowStyle,
    pub start_circle: CircleStyle,
    pub intermediate_circle: CircleStyle,
    pub current_circle: CircleStyle,
    pub end_circle: CircleStyle,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            unit: MeasurementUnit::Metric,
            show_bearings: false,
            show_arrows: true,
            clear_measurements_on_stop: true,
            arc_points: DEFAULT_ARC_POINTS,
            temp_line: LineStyle {
                color: "#00f".to_string(),
                weight: 2.0,
                dashed: true,
            },
            fixed_line: LineStyle::default(),
            arrow: ArrowStyle::default(),
            start_circle: CircleStyle::filled("#0f0"),
            intermediate_circle: CircleStyle::filled("#ff0"),
            current_circle: CircleStyle::filled("#f0f"),
            end_circle: CircleStyle::filled("#f00"),
        }
    }
}

impl MeasureOptions {
    /// Parses and validates options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: MeasureOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads and validates options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Circle style for a vertex role.
    pub fn circle_style(&self, role: VertexRole) -> &CircleStyle {
        match role {
            VertexRole::Start => &self.start_circle,
            VertexRole::Intermediate => &self.intermediate_circle,
            VertexRole::Current => &self.current_circle,
            VertexRole::End => &self.end_circle,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.arc_points < 2 {
            return Err(MeasureError::InvalidOption(format!(
                "arc_points must be at least 2, got {}",
                self.arc_points
            )));
        }

        let lines = [("temp_line", &self.temp_line), ("fixed_line", &self.fixed_line)];
        for (name, style) in lines {
            check_color(name, &style.color)?;
            check_size(name, "weight", style.weight)?;
        }

        check_color("arrow", &self.arrow.color)?;
        check_size("arrow", "size", self.arrow.size)?;

        let circles = [
            ("start_circle", &self.start_circle),
            ("intermediate_circle", &self.intermediate_circle),
            ("current_circle", &self.current_circle),
            ("end_circle", &self.end_circle),
        ];
        for (name, style) in circles {
            check_color(name, &style.color)?;
            check_color(name, &style.fill_color)?;
            check_size(name, "weight", style.weight)?;
            check_size(name, "radius", style.radius)?;
            if !(0.0..=1.0).contains(&style.fill_opacity) {
                return Err(MeasureError::InvalidOption(format!(
                    "{}.fill_opacity must be within [0, 1]",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn check_color(owner: &str, color: &str) -> Result<()> {
    parse_hex_color(color)
        .map(|_| ())
        .ok_or_else(|| MeasureError::InvalidOption(format!("{}: bad color {:?}", owner, color)))
}

fn check_size(owner: &str, field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MeasureError::InvalidOption(format!(
            "{}.{} must be a non-negative number",
            owner, field
        )))
    }
}

/// Parses `#rgb` or `#rrggbb` into RGB bytes.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, ch) in hex.chars().enumerate() {
                let v = ch.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for (i, channel) in rgb.iter_mut().enumerate() {
                *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}
