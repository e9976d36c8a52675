//! strokeplot crate root: re-exports and module wiring.
//!
//! Renders live rowing telemetry as a per-stroke velocity trace and session
//! strip-charts, emitting backend-neutral draw commands incrementally.
//!
//! - `sink`: sample types and the channel the transport pushes into
//! - `data`: session buffer, stroke segmenter and work accumulator
//! - `projection`: telemetry to pixel mapping per chart
//! - `render`: draw primitives and the chart renderers
//! - `engine`: the pure per-frame transition and the frame loop driver
//! - `config`: chart layout, palette and sensor calibration
//! - `surface`: retained tiny-skia raster that executes draw commands
//! - `app`: eframe viewer; `demo`: synthetic rower for it

pub mod app;
pub mod config;
pub mod data;
pub mod demo;
pub mod engine;
pub mod error;
pub mod projection;
pub mod render;
pub mod sink;
pub mod surface;

// Public re-exports for a compact external API
pub use app::{run_strokeplot, StrokeplotApp};
pub use config::StrokeplotConfig;
pub use engine::{advance_frame, Engine, FrameState};
pub use error::{Error, Result};
pub use render::DrawCommand;
pub use sink::{channel_samples, Inbound, Sample, SampleSink};
