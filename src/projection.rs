//! Mapping from telemetry values to chart-local pixel coordinates.
//!
//! A [`Viewport`] is a plain affine description of one chart for one frame:
//! `x = (time - time_origin) * time_scale` and
//! `y = value_offset + value * value_scale`.
//! The projectors build the viewport from their configuration and apply it.
//! Both are pure: the same sample and viewport always give the same point.

use serde::{Deserialize, Serialize};

use crate::sink::Sample;

/// A projected point in chart-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const ORIGIN: PixelPoint = PixelPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Time subtracted before scaling (µs).
    pub time_origin: f64,
    /// Pixels per µs.
    pub time_scale: f64,
    /// Pixels per raw value unit.
    pub value_scale: f64,
    /// Pixel row of a zero value.
    pub value_offset: f64,
}

/// Denominator that can never produce an infinite scale.
fn nonzero(d: f64) -> f64 {
    if d == 0.0 || !d.is_finite() {
        1.0
    } else {
        d
    }
}

/// Clamp into `[lo, hi]`, sending NaN to `fallback`.
fn saturate(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_nan() {
        fallback
    } else {
        v.clamp(lo, hi)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stroke trace
// ─────────────────────────────────────────────────────────────────────────────

/// Projects stroke time against velocity for the per-stroke trace.
///
/// `y` is relative to the chart's mid-height with up negative, and both axes
/// saturate at the chart edges so consecutive segments stay on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeTraceProjector {
    pub display_window_micros: f64,
    pub velocity_divisor: f64,
    /// Scaled velocity drawn at full half-height.
    pub velocity_full_scale: f64,
}

impl Default for StrokeTraceProjector {
    fn default() -> Self {
        Self {
            display_window_micros: 3e6,
            velocity_divisor: 1e4,
            velocity_full_scale: 5.0,
        }
    }
}

impl StrokeTraceProjector {
    pub fn viewport(&self, width: f64, height: f64) -> Viewport {
        let half = height / 2.0;
        Viewport {
            width,
            height,
            time_origin: 0.0,
            time_scale: width / nonzero(self.display_window_micros),
            value_scale: -half
                / (nonzero(self.velocity_full_scale) * nonzero(self.velocity_divisor)),
            value_offset: 0.0,
        }
    }

    pub fn project(&self, sample: &Sample, vp: &Viewport) -> PixelPoint {
        let half = (vp.height / 2.0).abs();
        let half = if half.is_nan() { 0.0 } else { half };
        let x = (sample.stroke_time_micros - vp.time_origin) * vp.time_scale;
        let y = vp.value_offset + sample.velocity * vp.value_scale;
        PixelPoint {
            x: saturate(x, 0.0, vp.width.max(0.0), 0.0),
            y: saturate(y, -half, half, 0.0),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Strip charts
// ─────────────────────────────────────────────────────────────────────────────

/// Sample field plotted by a strip chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StripField {
    StrokeRate,
    Power,
}

impl StripField {
    pub fn raw(self, sample: &Sample) -> f64 {
        match self {
            StripField::StrokeRate => sample.stroke_rate,
            StripField::Power => sample.power,
        }
    }
}

/// Projects session time against one field so the whole session fits the width.
///
/// `y` is measured from the top edge. Values above `max_value` land above the
/// chart (negative `y`) rather than being clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripProjector {
    pub field: StripField,
    pub field_divisor: f64,
    pub max_value: f64,
}

impl StripProjector {
    /// Viewport for a session that began at `start` and has reached `now` (µs).
    pub fn viewport(&self, width: f64, height: f64, start: f64, now: f64) -> Viewport {
        let delta = (now - start).max(0.0);
        Viewport {
            width,
            height,
            time_origin: start,
            time_scale: width / (delta + 1.0),
            value_scale: -height / (nonzero(self.max_value) * nonzero(self.field_divisor)),
            value_offset: height,
        }
    }

    pub fn project(&self, sample: &Sample, vp: &Viewport) -> PixelPoint {
        self.project_time(sample.session_time_micros, self.field.raw(sample), vp)
    }

    /// Project a raw `(session time, field value)` pair.
    pub fn project_time(&self, time_micros: f64, raw: f64, vp: &Viewport) -> PixelPoint {
        PixelPoint {
            x: (time_micros - vp.time_origin) * vp.time_scale,
            y: vp.value_offset + raw * vp.value_scale,
        }
    }

    /// Pixel row of a scaled (already divided) field value.
    pub fn value_row(&self, value: f64, vp: &Viewport) -> f64 {
        vp.value_offset + value * nonzero(self.field_divisor) * vp.value_scale
    }

    /// Scaled field value, as shown in readouts.
    pub fn scaled(&self, sample: &Sample) -> f64 {
        self.field.raw(sample) / nonzero(self.field_divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace() -> StrokeTraceProjector {
        StrokeTraceProjector::default()
    }

    #[test]
    fn stroke_time_past_window_saturates_at_width() {
        let p = trace();
        let vp = p.viewport(400.0, 200.0);
        let pt = p.project(&Sample::new(0.0, 9e9, 0.0, 0.0, 0.0), &vp);
        assert_eq!(pt.x, 400.0);
    }

    #[test]
    fn velocity_saturates_at_half_height() {
        let p = trace();
        let vp = p.viewport(400.0, 200.0);
        let up = p.project(&Sample::new(0.0, 1.0, 1e9, 0.0, 0.0), &vp);
        let down = p.project(&Sample::new(0.0, 1.0, -1e9, 0.0, 0.0), &vp);
        assert_eq!(up.y, -100.0);
        assert_eq!(down.y, 100.0);
    }

    #[test]
    fn negative_stroke_time_saturates_at_zero() {
        let p = trace();
        let vp = p.viewport(400.0, 200.0);
        assert_eq!(p.project(&Sample::new(0.0, -5e5, 0.0, 0.0, 0.0), &vp).x, 0.0);
    }

    #[test]
    fn garbage_velocity_is_centred() {
        let p = trace();
        let vp = p.viewport(400.0, 200.0);
        let pt = p.project(&Sample::new(0.0, 1.0, f64::NAN, 0.0, 0.0), &vp);
        assert_eq!(pt.y, 0.0);
        let inf = p.project(&Sample::new(0.0, f64::INFINITY, f64::INFINITY, 0.0, 0.0), &vp);
        assert_eq!(inf, PixelPoint::new(400.0, -100.0));
    }

    #[test]
    fn projection_is_idempotent() {
        let p = trace();
        let vp = p.viewport(400.0, 200.0);
        let s = Sample::new(5.0, 123_456.0, 7_777.0, 1.0, 2.0);
        assert_eq!(p.project(&s, &vp), p.project(&s, &vp));
    }

    #[test]
    fn zero_window_does_not_produce_nan() {
        let p = StrokeTraceProjector {
            display_window_micros: 0.0,
            ..trace()
        };
        let vp = p.viewport(400.0, 200.0);
        let pt = p.project(&Sample::new(0.0, 100.0, 5000.0, 0.0, 0.0), &vp);
        assert!(pt.x.is_finite() && pt.y.is_finite());
    }

    #[test]
    fn strip_handles_zero_length_session() {
        let p = StripProjector {
            field: StripField::StrokeRate,
            field_divisor: 10.0,
            max_value: 60.0,
        };
        let vp = p.viewport(800.0, 200.0, 1_000.0, 1_000.0);
        let pt = p.project(&Sample::new(1_000.0, 0.0, 0.0, 0.0, 300.0), &vp);
        assert_eq!(pt.x, 0.0);
        assert!((pt.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn strip_overflows_above_max() {
        let p = StripProjector {
            field: StripField::StrokeRate,
            field_divisor: 10.0,
            max_value: 60.0,
        };
        let vp = p.viewport(800.0, 200.0, 0.0, 1e6);
        let pt = p.project(&Sample::new(1e6, 0.0, 0.0, 0.0, 900.0), &vp);
        assert!(pt.y < 0.0);
        assert!((pt.x - 800.0 * 1e6 / (1e6 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn strip_power_field_and_value_rows() {
        let p = StripProjector {
            field: StripField::Power,
            field_divisor: 1.0,
            max_value: 500.0,
        };
        let vp = p.viewport(800.0, 200.0, 0.0, 10.0);
        assert_eq!(p.value_row(0.0, &vp), 200.0);
        assert!(p.value_row(500.0, &vp).abs() < 1e-9);
        assert_eq!(p.scaled(&Sample::new(0.0, 0.0, 0.0, 250.0, 0.0)), 250.0);
        let y = p.project(&Sample::new(0.0, 0.0, 0.0, 250.0, 0.0), &vp).y;
        assert!((y - 100.0).abs() < 1e-9);
    }
}
