//! Inbound sample types and the channel that feeds them to the frame loop.
//!
//! The transport collaborator (websocket client, serial reader, replay tool, ...)
//! owns a [`SampleSink`] and pushes already-decoded [`Sample`]s into it. The frame
//! loop owns the matching `Receiver<Inbound>` and drains it once per frame.

use std::sync::mpsc::{Receiver, SendError, Sender};

/// One decoded telemetry tick from the rowing machine.
///
/// All fields are kept in the device's raw units; scaling happens in the
/// projectors using the calibration values from [`crate::config`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Elapsed time since session start (µs), non-decreasing.
    pub session_time_micros: f64,
    /// Elapsed time since the current stroke began (µs). `0` starts a new stroke.
    pub stroke_time_micros: f64,
    /// Signed instantaneous handle/flywheel velocity.
    pub velocity: f64,
    /// Power figure as reported (or synthesized) by the source.
    pub power: f64,
    /// Strokes per minute at reduced precision.
    pub stroke_rate: f64,
}

impl Sample {
    pub fn new(
        session_time_micros: f64,
        stroke_time_micros: f64,
        velocity: f64,
        power: f64,
        stroke_rate: f64,
    ) -> Self {
        Self {
            session_time_micros,
            stroke_time_micros,
            velocity,
            power,
            stroke_rate,
        }
    }

    /// Build a sample from the 5-field positional record
    /// `[session_time, stroke_time, velocity, power, stroke_rate]`.
    pub fn from_fields(fields: [f64; 5]) -> Self {
        let [t, st, v, p, r] = fields;
        Self::new(t, st, v, p, r)
    }

    /// `true` when this sample closes the previous stroke and opens a new one.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.stroke_time_micros == 0.0
    }
}

/// Messages the transport collaborator can hand to the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inbound {
    /// Handshake acknowledgement sent before real data; observed, never stored.
    Connected,
    /// A shape-valid telemetry sample.
    Sample(Sample),
}

impl From<Sample> for Inbound {
    fn from(s: Sample) -> Self {
        Inbound::Sample(s)
    }
}

/// Convenience sender used by the transport side.
#[derive(Clone)]
pub struct SampleSink {
    tx: Sender<Inbound>,
}

impl SampleSink {
    /// Forward a decoded sample. Fails only once the frame loop has gone away.
    pub fn send_sample(&self, sample: Sample) -> Result<(), SendError<Inbound>> {
        self.tx.send(Inbound::Sample(sample))
    }

    /// Send a chunk of samples in arrival order.
    pub fn send_samples<I>(&self, samples: I) -> Result<(), SendError<Inbound>>
    where
        I: IntoIterator<Item = Sample>,
    {
        for s in samples {
            self.send_sample(s)?;
        }
        Ok(())
    }

    /// Report the transport handshake.
    pub fn send_connected(&self) -> Result<(), SendError<Inbound>> {
        self.tx.send(Inbound::Connected)
    }
}

/// Create a new channel pair: `(SampleSink, Receiver<Inbound>)`.
pub fn channel_samples() -> (SampleSink, Receiver<Inbound>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (SampleSink { tx }, rx)
}
