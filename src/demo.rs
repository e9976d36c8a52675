//! Synthetic rower used by the viewer when no transport is attached.

use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::sink::{Sample, SampleSink};

/// Endless stream of plausible rowing samples in the sensor's raw units.
///
/// Each stroke is a sine-shaped drive over the first `drive_fraction` of the
/// stroke followed by a shallower negative recovery.
#[derive(Debug, Clone)]
pub struct SyntheticRower {
    pub tick_micros: u64,
    pub base_rate_spm: f64,
    /// Raw velocity at the top of the drive.
    pub peak_velocity: f64,
    /// Raw velocity at the bottom of the recovery (positive number).
    pub recovery_velocity: f64,
    pub drive_fraction: f64,
    tick: u64,
    stroke: u64,
    stroke_tick: u64,
    ticks_per_stroke: u64,
    rate_spm: f64,
}

impl Default for SyntheticRower {
    fn default() -> Self {
        Self::new(10_000, 24.0)
    }
}

impl SyntheticRower {
    pub fn new(tick_micros: u64, base_rate_spm: f64) -> Self {
        let mut rower = Self {
            tick_micros: tick_micros.max(1),
            base_rate_spm: base_rate_spm.max(1.0),
            peak_velocity: 30_000.0,
            recovery_velocity: 12_000.0,
            drive_fraction: 0.35,
            tick: 0,
            stroke: 0,
            stroke_tick: 0,
            ticks_per_stroke: 1,
            rate_spm: base_rate_spm,
        };
        rower.plan_stroke();
        rower
    }

    /// Pick this stroke's rate and length; the rate wanders a little between strokes.
    fn plan_stroke(&mut self) {
        self.rate_spm = self.base_rate_spm + 2.0 * (self.stroke as f64 * 0.3).sin();
        let period_micros = 60e6 / self.rate_spm;
        self.ticks_per_stroke = ((period_micros / self.tick_micros as f64).round() as u64).max(2);
    }

    fn velocity_at(&self, phase: f64) -> f64 {
        let drive = self.drive_fraction.clamp(0.05, 0.95);
        if phase < drive {
            self.peak_velocity * (std::f64::consts::PI * phase / drive).sin()
        } else {
            -self.recovery_velocity * (std::f64::consts::PI * (phase - drive) / (1.0 - drive)).sin()
        }
    }
}

impl Iterator for SyntheticRower {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.stroke_tick == self.ticks_per_stroke {
            self.stroke += 1;
            self.stroke_tick = 0;
            self.plan_stroke();
        }
        let phase = self.stroke_tick as f64 / self.ticks_per_stroke as f64;
        let velocity = self.velocity_at(phase).round();
        let power = (150.0 + 40.0 * (self.stroke as f64 * 0.17).sin()).round();
        let sample = Sample {
            session_time_micros: (self.tick * self.tick_micros) as f64,
            stroke_time_micros: (self.stroke_tick * self.tick_micros) as f64,
            velocity,
            power,
            // reported at tenth-of-a-stroke precision
            stroke_rate: (self.rate_spm * 10.0).round(),
        };
        self.tick += 1;
        self.stroke_tick += 1;
        Some(sample)
    }
}

/// Feed `rower` into `sink` in real time on a background thread.
///
/// Stops once the receiving side has been dropped.
pub fn spawn_demo(sink: SampleSink, rower: SyntheticRower) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let tick = Duration::from_micros(rower.tick_micros);
        if sink.send_connected().is_err() {
            return;
        }
        for sample in rower {
            if sink.send_sample(sample).is_err() {
                debug!("viewer closed; stopping synthetic rower");
                return;
            }
            std::thread::sleep(tick);
        }
    })
}
