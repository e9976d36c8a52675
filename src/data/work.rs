//! Per-stroke work integration from calibrated velocity.

/// Force derived from one velocity reading, plus the running total after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSample {
    /// Velocity after calibration scaling.
    pub velocity: f64,
    /// `sign(v) * v²`. Negative during the recovery.
    pub force: f64,
    pub total_work: f64,
}

/// Integrates drive-phase force over one stroke.
///
/// Only positive velocities add to the total; the recovery force is returned
/// in [`ForceSample::force`] for display and otherwise dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkAccumulator {
    velocity_divisor: f64,
    total_work: f64,
}

impl Default for WorkAccumulator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl WorkAccumulator {
    pub fn new(velocity_divisor: f64) -> Self {
        let velocity_divisor = if velocity_divisor == 0.0 || !velocity_divisor.is_finite() {
            1.0
        } else {
            velocity_divisor
        };
        Self {
            velocity_divisor,
            total_work: 0.0,
        }
    }

    pub fn update(&mut self, raw_velocity: f64) -> ForceSample {
        let velocity = raw_velocity / self.velocity_divisor;
        let force = if velocity > 0.0 {
            let f = velocity * velocity;
            self.total_work += f;
            f
        } else {
            -velocity * velocity
        };
        ForceSample {
            velocity,
            force,
            total_work: self.total_work,
        }
    }

    pub fn reset(&mut self) {
        self.total_work = 0.0;
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.total_work
    }

    #[inline]
    pub fn velocity_divisor(&self) -> f64 {
        self.velocity_divisor
    }
}
