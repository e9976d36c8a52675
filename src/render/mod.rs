//! Turning projected telemetry into draw primitives.
//!
//! - `commands`: the primitive set and a region-translating painter
//! - `stroke_trace`: incremental per-stroke trace with decay
//! - `strip`: full-redraw session strip-charts
//! - `readout`: opaque-backed numeric text boxes

pub mod commands;
pub mod readout;
pub mod strip;
pub mod stroke_trace;

pub use commands::{DrawCommand, Pos, Rect, RegionPainter, Rgba, Stroke};
pub use stroke_trace::StrokeTraceState;
