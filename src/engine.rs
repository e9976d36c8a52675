//! Frame engine: session ingestion plus the pure per-frame state transition.
//!
//! [`advance_frame`] is the core: it takes the previous [`FrameState`] and one
//! sample and returns the next state together with the draw commands for that
//! frame. [`Engine`] wraps it with the session buffer, the inbound channel and
//! the backpressure policy of the frame loop.

use std::sync::mpsc::Receiver;

use tracing::{debug, trace};

use crate::config::StrokeplotConfig;
use crate::data::segmenter::{ClosedStroke, SegmenterState};
use crate::data::session::SessionBuffer;
use crate::projection::PixelPoint;
use crate::render::{strip, stroke_trace, DrawCommand, StrokeTraceState};
use crate::sink::{Inbound, Sample};

/// All transient render state carried from one frame to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    trace: StrokeTraceState,
    frames: u64,
}

impl FrameState {
    pub fn new(cfg: &StrokeplotConfig) -> Self {
        Self {
            trace: StrokeTraceState::new(cfg.calibration.velocity_divisor),
            frames: 0,
        }
    }

    pub fn phase(&self) -> SegmenterState {
        self.trace.phase()
    }

    pub fn cursor(&self) -> PixelPoint {
        self.trace.cursor()
    }

    /// Work accumulated so far in the open stroke.
    pub fn total_work(&self) -> f64 {
        self.trace.total_work()
    }

    /// Most recently closed stroke, as shown on its boundary frame.
    pub fn last_closed(&self) -> Option<ClosedStroke> {
        self.trace.last_closed()
    }

    pub fn strokes_closed(&self) -> u64 {
        self.trace.strokes_closed()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Advance only the stroke trace by one sample.
pub fn advance_trace(
    mut state: FrameState,
    sample: &Sample,
    cfg: &StrokeplotConfig,
) -> (FrameState, Vec<DrawCommand>) {
    let mut out = Vec::new();
    stroke_trace::render(&mut state.trace, sample, cfg, &mut out);
    (state, out)
}

/// Render one frame for `sample`: extend the stroke trace and redraw every strip.
///
/// `session` must already contain `sample`.
pub fn advance_frame(
    state: FrameState,
    sample: &Sample,
    session: &SessionBuffer,
    cfg: &StrokeplotConfig,
) -> (FrameState, Vec<DrawCommand>) {
    let (mut state, mut out) = advance_trace(state, sample, cfg);
    for chart in &cfg.strips {
        strip::render(chart, &cfg.calibration, &cfg.palette, session, sample, &mut out);
    }
    state.frames += 1;
    (state, out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the session and drives [`advance_frame`] once per display refresh.
///
/// Ingestion and rendering are interleaved on one thread: whatever has been
/// pumped before [`frame`](Self::frame) is visible to it, anything later waits.
pub struct Engine {
    config: StrokeplotConfig,
    session: SessionBuffer,
    state: FrameState,
    /// Number of session samples already consumed by the frame loop.
    consumed: usize,
}

impl Engine {
    pub fn new(config: StrokeplotConfig) -> Self {
        let state = FrameState::new(&config);
        Self {
            config,
            session: SessionBuffer::new(),
            state,
            consumed: 0,
        }
    }

    pub fn config(&self) -> &StrokeplotConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionBuffer {
        &self.session
    }

    pub fn state(&self) -> &FrameState {
        &self.state
    }

    /// Observe one inbound message. The handshake is never stored.
    pub fn ingest(&mut self, msg: Inbound) {
        match msg {
            Inbound::Connected => debug!("transport connected"),
            Inbound::Sample(s) => self.session.push(s),
        }
    }

    /// Drain everything currently queued on `rx`. Returns the number of messages.
    pub fn pump(&mut self, rx: &Receiver<Inbound>) -> usize {
        let mut n = 0;
        for msg in rx.try_iter() {
            self.ingest(msg);
            n += 1;
        }
        n
    }

    /// Samples appended since the last frame.
    pub fn pending(&self) -> &[Sample] {
        &self.session.samples()[self.consumed.min(self.session.len())..]
    }

    /// Produce the draw commands for this refresh.
    ///
    /// Only the newest sample extends the stroke trace. If a boundary was among
    /// the skipped samples, the latest such boundary is rendered first so the
    /// decay, reset and work publication still happen. Returns nothing when no
    /// sample arrived since the previous frame.
    pub fn frame(&mut self) -> Vec<DrawCommand> {
        let pending = self.pending();
        let Some((&latest, skipped)) = pending.split_last() else {
            return Vec::new();
        };
        let boundary = skipped.iter().rev().find(|s| s.is_boundary()).copied();
        if !skipped.is_empty() {
            trace!(skipped = skipped.len(), "frame behind; drawing latest sample only");
        }

        let mut state = std::mem::replace(&mut self.state, FrameState::new(&self.config));
        let mut out = Vec::new();
        if let Some(b) = boundary {
            let (next, cmds) = advance_trace(state, &b, &self.config);
            state = next;
            out.extend(cmds);
        }
        let (state, cmds) = advance_frame(state, &latest, &self.session, &self.config);
        out.extend(cmds);
        self.state = state;
        self.consumed = self.session.len();
        out
    }

    /// Forget the session history and all render state.
    pub fn new_session(&mut self) {
        debug!(samples = self.session.len(), "starting new session");
        self.session.clear();
        self.state = FrameState::new(&self.config);
        self.consumed = 0;
    }

    /// Stretch the strips to a new surface width. Takes effect on the next frame.
    pub fn fit_strips_to_width(&mut self, width: f32) {
        self.config.fit_strips_to_width(width);
    }

    /// Restart the trace so the next frame repaints its region from scratch.
    pub fn restart_trace(&mut self) {
        let frames = self.state.frames;
        self.state = FrameState::new(&self.config);
        self.state.frames = frames;
    }
}
