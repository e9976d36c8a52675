//! Session strip-charts, fully redrawn every frame.
//!
//! A strip only gains a point per stroke, so rescanning the session's boundary
//! samples each frame stays cheap next to the per-tick sample rate.

use crate::config::{Calibration, Palette, StripChartConfig};
use crate::data::session::SessionBuffer;
use crate::projection::{StripProjector, Viewport};
use crate::sink::Sample;

use super::commands::{DrawCommand, Pos, Rect, RegionPainter, Stroke};
use super::readout::{draw_readout, format_truncated};

/// Upper bound on grid lines per axis so a tiny step can't flood the frame.
const MAX_GRID_LINES: usize = 512;

pub fn projector(chart: &StripChartConfig, calibration: &Calibration) -> StripProjector {
    StripProjector {
        field: chart.field,
        field_divisor: calibration.field_divisor(chart.field),
        max_value: chart.max_value,
    }
}

/// Multiples of `step` in `[first, limit]` (or `[first, limit)` when `inclusive` is false).
fn grid_steps(first: f64, step: f64, limit: f64, inclusive: bool) -> impl Iterator<Item = f64> {
    let usable = step.is_finite() && step > 0.0 && first.is_finite() && limit.is_finite();
    (0..MAX_GRID_LINES)
        .map(move |i| first + step * i as f64)
        .take_while(move |&v| usable && if inclusive { v <= limit } else { v < limit })
}

/// Redraw one strip chart from the session history, as of `latest`.
pub fn render(
    chart: &StripChartConfig,
    calibration: &Calibration,
    palette: &Palette,
    session: &SessionBuffer,
    latest: &Sample,
    out: &mut Vec<DrawCommand>,
) {
    let (w, h) = (chart.width, chart.height);
    let proj = projector(chart, calibration);
    let now = latest.session_time_micros;
    let start = session.start_time().unwrap_or(now);
    let delta = (now - start).max(0.0);
    let vp = proj.viewport(w as f64, h as f64, start, now);
    let mut painter = RegionPainter::new(Pos::new(chart.origin[0], chart.origin[1]), out);

    painter.clear(Rect::new(0.0, 0.0, w, h), palette.background);
    draw_grid(&mut painter, chart, &proj, &vp, delta, palette);

    let points = session.boundaries().filter_map(|s| {
        let p = proj.project(s, &vp);
        (p.x.is_finite() && p.y.is_finite()).then(|| Pos::new(p.x as f32, p.y as f32))
    });
    painter.polyline(points, Stroke::new(chart.line_width, palette.strip_line));

    let ro = &chart.readout;
    draw_readout(
        &mut painter,
        ro,
        w,
        0,
        format_truncated(delta / 1e6, 0),
        palette.strip_text,
        palette.background,
    );
    draw_readout(
        &mut painter,
        ro,
        w,
        1,
        format_truncated(proj.scaled(latest), ro.decimals),
        palette.strip_text,
        palette.background,
    );
}

fn draw_grid(
    painter: &mut RegionPainter<'_>,
    chart: &StripChartConfig,
    proj: &StripProjector,
    vp: &Viewport,
    delta: f64,
    palette: &Palette,
) {
    let (w, h) = (chart.width, chart.height);
    let minor = Stroke::new(1.0, palette.minor_grid);
    let major = Stroke::new(1.0, palette.major_grid);

    for v in grid_steps(0.0, chart.value_grid_step, chart.max_value, true) {
        let y = proj.value_row(v, vp) as f32;
        painter.line(Pos::new(0.0, y), Pos::new(w, y), minor);
    }
    for (step, stroke) in [
        (chart.minor_time_grid_micros, minor),
        (chart.major_time_grid_micros, major),
    ] {
        for t in grid_steps(step, step, delta, false) {
            let x = (t * vp.time_scale) as f32;
            painter.line(Pos::new(x, 0.0), Pos::new(x, h), stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> StripChartConfig {
        StripChartConfig::stroke_rate()
    }

    fn session(samples: &[Sample]) -> SessionBuffer {
        let mut buf = SessionBuffer::new();
        for s in samples {
            buf.push(*s);
        }
        buf
    }

    #[test]
    fn grid_steps_bounds() {
        let v: Vec<f64> = grid_steps(0.0, 10.0, 60.0, true).collect();
        assert_eq!(v.len(), 7);
        let t: Vec<f64> = grid_steps(15.0, 15.0, 45.0, false).collect();
        assert_eq!(t, vec![15.0, 30.0]);
        assert_eq!(grid_steps(0.0, 0.0, 60.0, true).count(), 0);
        assert_eq!(grid_steps(1.0, 1e-9, 1e9, false).count(), MAX_GRID_LINES);
    }

    #[test]
    fn polyline_has_one_point_per_stroke() {
        let samples = [
            Sample::new(0.0, 0.0, 0.0, 0.0, 200.0),
            Sample::new(1e6, 1e6, 0.0, 0.0, 200.0),
            Sample::new(2e6, 0.0, 0.0, 0.0, 220.0),
            Sample::new(3e6, 1e6, 0.0, 0.0, 220.0),
            Sample::new(4e6, 0.0, 0.0, 0.0, 240.0),
        ];
        let buf = session(&samples);
        let mut out = Vec::new();
        let cfg = chart();
        render(
            &cfg,
            &Calibration::default(),
            &Palette::default(),
            &buf,
            buf.latest().unwrap(),
            &mut out,
        );
        let poly = out
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(poly.len(), 3);
        // translated into the strip's region
        assert_eq!(poly[0].x, 400.0);
        assert!(poly.windows(2).all(|p| p[0].x <= p[1].x));
    }

    #[test]
    fn redraw_starts_with_opaque_clear_and_ends_with_readouts() {
        let buf = session(&[Sample::new(0.0, 0.0, 0.0, 0.0, 245.0)]);
        let mut out = Vec::new();
        render(
            &chart(),
            &Calibration::default(),
            &Palette::default(),
            &buf,
            buf.latest().unwrap(),
            &mut out,
        );
        assert!(matches!(out[0], DrawCommand::ClearRegion { rect, .. }
            if rect == Rect::new(400.0, 0.0, 800.0, 200.0)));
        let texts: Vec<&str> = out
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["0", "24.5"]);
    }

    #[test]
    fn time_grid_follows_session_length() {
        let buf = session(&[
            Sample::new(0.0, 0.0, 0.0, 0.0, 0.0),
            Sample::new(130e6, 5.0, 0.0, 0.0, 0.0),
        ]);
        let mut out = Vec::new();
        let palette = Palette::default();
        render(
            &chart(),
            &Calibration::default(),
            &palette,
            &buf,
            buf.latest().unwrap(),
            &mut out,
        );
        let verticals = |color| {
            out.iter()
                .filter(|c| matches!(c, DrawCommand::LineSegment { from, to, stroke }
                    if from.x == to.x && stroke.color == color))
                .count()
        };
        // minor every 15 s below 130 s, major at 60 s and 120 s
        assert_eq!(verticals(palette.minor_grid), 8);
        assert_eq!(verticals(palette.major_grid), 2);
    }
}
