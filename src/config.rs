//! Configuration for the charts and the sensor calibration.
//!
//! Everything here is caller supplied. [`StrokeplotConfig::default`] reproduces the
//! layout of the classic rower display: a 400×200 stroke trace on the left and the
//! stroke-rate strip to its right, with a power strip underneath.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::projection::StripField;
use crate::render::Rgba;

// ─────────────────────────────────────────────────────────────────────────────
// Calibration
// ─────────────────────────────────────────────────────────────────────────────

/// Sensor-specific scaling constants.
///
/// These depend on the raw units of a particular rowing machine, so they are
/// configuration rather than fixed values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Raw velocity is divided by this before squaring into force.
    pub velocity_divisor: f64,
    /// Scaled velocity that maps to a full half-height deflection on the trace.
    pub velocity_full_scale: f64,
    /// Raw stroke rate is divided by this to get strokes per minute.
    pub stroke_rate_divisor: f64,
    /// Raw power is divided by this before plotting.
    pub power_divisor: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            velocity_divisor: 1e4,
            velocity_full_scale: 5.0,
            stroke_rate_divisor: 10.0,
            power_divisor: 1.0,
        }
    }
}

impl Calibration {
    /// Divisor applied to the raw value of a strip-chart field.
    pub fn field_divisor(&self, field: StripField) -> f64 {
        match field {
            StripField::StrokeRate => self.stroke_rate_divisor,
            StripField::Power => self.power_divisor,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Readouts
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-size text box anchored to a chart's top-right corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadoutConfig {
    pub width: f32,
    /// Height of one text line; readouts stack downwards in multiples of this.
    pub line_height: f32,
    pub text_size: f32,
    /// Digits kept after the decimal point (values are truncated, not rounded).
    pub decimals: usize,
}

impl Default for ReadoutConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            line_height: 50.0,
            text_size: 50.0,
            decimals: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Charts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeTraceConfig {
    /// Top-left corner of the chart on the surface.
    pub origin: [f32; 2],
    pub width: f32,
    pub height: f32,
    /// Stroke time shown across the full width (µs).
    pub display_window_micros: f64,
    /// Alpha of the black overlay painted at each stroke boundary.
    pub decay_alpha: u8,
    pub line_width: f32,
    pub readout: ReadoutConfig,
}

impl Default for StrokeTraceConfig {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0],
            width: 400.0,
            height: 200.0,
            display_window_micros: 3e6,
            decay_alpha: 5,
            line_width: 2.0,
            readout: ReadoutConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripChartConfig {
    pub field: StripField,
    pub origin: [f32; 2],
    pub width: f32,
    pub height: f32,
    /// Field value drawn at the top edge. Larger values overflow above it.
    pub max_value: f64,
    /// Spacing of the horizontal value grid lines.
    pub value_grid_step: f64,
    pub minor_time_grid_micros: f64,
    pub major_time_grid_micros: f64,
    pub line_width: f32,
    pub readout: ReadoutConfig,
}

impl StripChartConfig {
    pub fn stroke_rate() -> Self {
        Self::default()
    }

    pub fn power() -> Self {
        Self {
            field: StripField::Power,
            origin: [400.0, 200.0],
            max_value: 500.0,
            value_grid_step: 100.0,
            readout: ReadoutConfig {
                decimals: 0,
                ..ReadoutConfig::default()
            },
            ..Self::default()
        }
    }
}

impl Default for StripChartConfig {
    fn default() -> Self {
        Self {
            field: StripField::StrokeRate,
            origin: [400.0, 0.0],
            width: 800.0,
            height: 200.0,
            max_value: 60.0,
            value_grid_step: 10.0,
            minor_time_grid_micros: 15e6,
            major_time_grid_micros: 60e6,
            line_width: 2.0,
            readout: ReadoutConfig {
                decimals: 1,
                ..ReadoutConfig::default()
            },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgba,
    pub trace: Rgba,
    pub baseline: Rgba,
    pub minor_grid: Rgba,
    pub major_grid: Rgba,
    pub strip_line: Rgba,
    pub trace_text: Rgba,
    pub strip_text: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            trace: Rgba::rgb(0, 255, 0),
            baseline: Rgba::gray(50),
            minor_grid: Rgba::gray(50),
            major_grid: Rgba::gray(100),
            strip_line: Rgba::WHITE,
            trace_text: Rgba::rgb(0, 255, 0),
            strip_text: Rgba::WHITE,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Top-level configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Complete configuration for an [`Engine`](crate::engine::Engine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeplotConfig {
    pub calibration: Calibration,
    pub stroke_trace: StrokeTraceConfig,
    /// Strip charts, drawn in order. Empty disables the session view.
    pub strips: Vec<StripChartConfig>,
    pub palette: Palette,
}

impl Default for StrokeplotConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            stroke_trace: StrokeTraceConfig::default(),
            strips: vec![StripChartConfig::stroke_rate(), StripChartConfig::power()],
            palette: Palette::default(),
        }
    }
}

impl StrokeplotConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a configuration file, picking the parser from the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Smallest surface that contains every chart.
    pub fn surface_size(&self) -> [f32; 2] {
        let t = &self.stroke_trace;
        let mut w = t.origin[0] + t.width;
        let mut h = t.origin[1] + t.height;
        for s in &self.strips {
            w = w.max(s.origin[0] + s.width);
            h = h.max(s.origin[1] + s.height);
        }
        [w.max(0.0), h.max(0.0)]
    }

    /// Stretch every strip chart so its right edge meets `surface_width`,
    /// the way the session strip fills whatever room the trace leaves.
    pub fn fit_strips_to_width(&mut self, surface_width: f32) {
        for s in &mut self.strips {
            s.width = (surface_width - s.origin[0]).max(0.0);
        }
    }
}
