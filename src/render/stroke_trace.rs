//! Incremental per-stroke velocity trace.
//!
//! The trace region is never redrawn: each sample extends the current stroke
//! by one segment, and each boundary lays a faint translucent fill over the
//! region so the previous few strokes stay visible while fading out.

use crate::config::StrokeplotConfig;
use crate::data::segmenter::{ClosedStroke, SegmenterState, StrokeEvent, StrokeSegmenter};
use crate::data::work::WorkAccumulator;
use crate::projection::{PixelPoint, StrokeTraceProjector};
use crate::sink::Sample;

use super::commands::{DrawCommand, Pos, Rect, RegionPainter, Stroke};
use super::readout::{draw_readout, format_truncated};

/// Transient state of the stroke-trace chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeTraceState {
    segmenter: StrokeSegmenter,
    work: WorkAccumulator,
    /// Last projected point, chart-local with `y` relative to mid-height.
    cursor: PixelPoint,
    last_closed: Option<ClosedStroke>,
    needs_clear: bool,
}

impl StrokeTraceState {
    pub fn new(velocity_divisor: f64) -> Self {
        Self {
            segmenter: StrokeSegmenter::new(),
            work: WorkAccumulator::new(velocity_divisor),
            cursor: PixelPoint::ORIGIN,
            last_closed: None,
            needs_clear: true,
        }
    }

    pub fn phase(&self) -> SegmenterState {
        self.segmenter.state()
    }

    pub fn cursor(&self) -> PixelPoint {
        self.cursor
    }

    pub fn total_work(&self) -> f64 {
        self.work.total()
    }

    pub fn last_closed(&self) -> Option<ClosedStroke> {
        self.last_closed
    }

    pub fn strokes_closed(&self) -> u64 {
        self.segmenter.strokes_closed()
    }
}

pub fn projector(cfg: &StrokeplotConfig) -> StrokeTraceProjector {
    StrokeTraceProjector {
        display_window_micros: cfg.stroke_trace.display_window_micros,
        velocity_divisor: cfg.calibration.velocity_divisor,
        velocity_full_scale: cfg.calibration.velocity_full_scale,
    }
}

/// Feed one sample to the trace and append the resulting primitives to `out`.
pub fn render(
    state: &mut StrokeTraceState,
    sample: &Sample,
    cfg: &StrokeplotConfig,
    out: &mut Vec<DrawCommand>,
) -> StrokeEvent {
    let tc = &cfg.stroke_trace;
    let palette = &cfg.palette;
    let (w, h) = (tc.width, tc.height);
    let mid = h / 2.0;
    let region = Rect::new(0.0, 0.0, w, h);
    let baseline = Stroke::new(1.0, palette.baseline);
    let mut painter = RegionPainter::new(Pos::new(tc.origin[0], tc.origin[1]), out);

    if state.needs_clear {
        painter.clear(region, palette.background);
        painter.line(Pos::new(0.0, mid), Pos::new(w, mid), baseline);
        state.needs_clear = false;
    }

    let event = state.segmenter.observe(sample, &mut state.work);
    let readout_value = match event {
        StrokeEvent::Opened { closed, force } => {
            painter.fill(region, palette.background.with_alpha(tc.decay_alpha));
            painter.line(Pos::new(0.0, mid), Pos::new(w, mid), baseline);
            state.cursor = PixelPoint::ORIGIN;
            match closed {
                Some(c) => {
                    state.last_closed = Some(c);
                    c.work
                }
                None => force.total_work,
            }
        }
        StrokeEvent::Continued(force) => {
            let proj = projector(cfg);
            let vp = proj.viewport(w as f64, h as f64);
            let pt = proj.project(sample, &vp);
            let from = Pos::new(state.cursor.x as f32, state.cursor.y as f32 + mid);
            let to = Pos::new(pt.x as f32, pt.y as f32 + mid);
            painter.line(from, to, Stroke::new(tc.line_width, palette.trace));
            state.cursor = pt;
            force.total_work
        }
    };

    draw_readout(
        &mut painter,
        &tc.readout,
        w,
        0,
        format_truncated(readout_value, tc.readout.decimals),
        palette.trace_text,
        palette.background,
    );
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_segments(cmds: &[DrawCommand]) -> usize {
        cmds.iter()
            .filter(|c| matches!(c, DrawCommand::LineSegment { stroke, .. } if stroke.width == 2.0))
            .count()
    }

    #[test]
    fn first_frame_clears_region_once() {
        let cfg = StrokeplotConfig::default();
        let mut st = StrokeTraceState::new(cfg.calibration.velocity_divisor);
        let mut out = Vec::new();
        render(&mut st, &Sample::new(0.0, 0.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        assert!(matches!(out[0], DrawCommand::ClearRegion { rect, .. } if rect == Rect::new(0.0, 0.0, 400.0, 200.0)));
        out.clear();
        render(&mut st, &Sample::new(1.0, 1.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        assert!(!out
            .iter()
            .any(|c| matches!(c, DrawCommand::ClearRegion { rect, .. } if rect.width == 400.0)));
    }

    #[test]
    fn one_segment_per_non_boundary_sample() {
        let cfg = StrokeplotConfig::default();
        let mut st = StrokeTraceState::new(cfg.calibration.velocity_divisor);
        let mut out = Vec::new();
        let samples = [
            Sample::new(0.0, 0.0, 0.0, 0.0, 0.0),
            Sample::new(1.0, 1e5, 1e4, 0.0, 0.0),
            Sample::new(2.0, 2e5, 2e4, 0.0, 0.0),
            Sample::new(3.0, 3e5, -1e4, 0.0, 0.0),
            Sample::new(4.0, 0.0, 0.0, 0.0, 0.0),
            Sample::new(5.0, 1e5, 1e4, 0.0, 0.0),
        ];
        for s in &samples {
            render(&mut st, s, &cfg, &mut out);
        }
        assert_eq!(count_segments(&out), 4);
        let decays = out
            .iter()
            .filter(|c| matches!(c, DrawCommand::FilledRect { color, .. } if color.a == 5))
            .count();
        assert_eq!(decays, 2);
    }

    #[test]
    fn segments_chain_from_cursor() {
        let mut cfg = StrokeplotConfig::default();
        cfg.stroke_trace.display_window_micros = 400.0;
        let mut st = StrokeTraceState::new(cfg.calibration.velocity_divisor);
        let mut out = Vec::new();
        render(&mut st, &Sample::new(0.0, 0.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        render(&mut st, &Sample::new(1.0, 200.0, 2.5e4, 0.0, 0.0), &cfg, &mut out);
        out.clear();
        render(&mut st, &Sample::new(2.0, 400.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        let seg = out
            .iter()
            .find_map(|c| match c {
                DrawCommand::LineSegment { from, to, stroke } if stroke.width == 2.0 => {
                    Some((*from, *to))
                }
                _ => None,
            })
            .unwrap();
        // 2.5 scaled velocity at full scale 5 is a quarter height up
        assert_eq!(seg.0, Pos::new(200.0, 50.0));
        assert_eq!(seg.1, Pos::new(400.0, 100.0));
    }

    #[test]
    fn boundary_readout_shows_closed_work() {
        let mut cfg = StrokeplotConfig::default();
        cfg.stroke_trace.readout.decimals = 2;
        let mut st = StrokeTraceState::new(cfg.calibration.velocity_divisor);
        let mut out = Vec::new();
        render(&mut st, &Sample::new(0.0, 0.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        render(&mut st, &Sample::new(1.0, 1.0, 3e4, 0.0, 0.0), &cfg, &mut out);
        out.clear();
        render(&mut st, &Sample::new(2.0, 0.0, 0.0, 0.0, 0.0), &cfg, &mut out);
        let text = out.iter().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(text.as_deref(), Some("9.00"));
        assert_eq!(st.total_work(), 0.0);
        assert_eq!(st.last_closed().unwrap().work, 9.0);
    }
}
