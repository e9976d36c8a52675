//! Stroke boundary detection.
//!
//! A sample with `stroke_time_micros == 0` both ends the previous stroke and
//! starts the next one. [`StrokeSegmenter::observe`] handles the close, the
//! accumulator reset and the boundary sample's own velocity in that order.

use crate::data::work::{ForceSample, WorkAccumulator};
use crate::sink::Sample;

/// Summary of a finished stroke, published when the next one begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedStroke {
    /// Drive-phase work accumulated over the stroke.
    pub work: f64,
    /// Raw stroke rate carried by the closing boundary sample.
    pub stroke_rate: f64,
    /// Raw power carried by the closing boundary sample.
    pub power: f64,
    /// Session time of the boundary that closed the stroke (µs).
    pub ended_at_micros: f64,
    /// Last stroke time observed before the boundary (µs).
    pub duration_micros: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmenterState {
    /// Nothing observed since the last reset.
    #[default]
    Idle,
    /// A stroke is open and feeding the accumulator.
    Accumulating,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    /// Ordinary sample inside the current stroke.
    Continued(ForceSample),
    /// Boundary sample. `closed` is `None` for the first stroke of a session.
    Opened {
        closed: Option<ClosedStroke>,
        force: ForceSample,
    },
}

impl StrokeEvent {
    pub fn force(&self) -> ForceSample {
        match *self {
            StrokeEvent::Continued(f) => f,
            StrokeEvent::Opened { force, .. } => force,
        }
    }

    pub fn is_boundary(&self) -> bool {
        matches!(self, StrokeEvent::Opened { .. })
    }

    pub fn closed(&self) -> Option<ClosedStroke> {
        match *self {
            StrokeEvent::Opened { closed, .. } => closed,
            StrokeEvent::Continued(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeSegmenter {
    state: SegmenterState,
    last_stroke_time: f64,
    strokes_closed: u64,
}

impl StrokeSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `sample` and drive `work` accordingly.
    pub fn observe(&mut self, sample: &Sample, work: &mut WorkAccumulator) -> StrokeEvent {
        if !sample.is_boundary() {
            self.state = SegmenterState::Accumulating;
            self.last_stroke_time = sample.stroke_time_micros;
            return StrokeEvent::Continued(work.update(sample.velocity));
        }

        let closed = match self.state {
            SegmenterState::Accumulating => {
                self.strokes_closed += 1;
                Some(ClosedStroke {
                    work: work.total(),
                    stroke_rate: sample.stroke_rate,
                    power: sample.power,
                    ended_at_micros: sample.session_time_micros,
                    duration_micros: self.last_stroke_time,
                })
            }
            SegmenterState::Idle => None,
        };

        work.reset();
        self.last_stroke_time = 0.0;
        self.state = SegmenterState::Accumulating;
        let force = work.update(sample.velocity);
        StrokeEvent::Opened { closed, force }
    }

    /// Forget the open stroke, e.g. when a new session starts.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    pub fn strokes_closed(&self) -> u64 {
        self.strokes_closed
    }
}
