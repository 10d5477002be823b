// src/pid/config.rs

//! # Controller Configuration
//!
//! Tuning parameters and operating ranges supplied once when a
//! [`Controller`](crate::Controller) is created. Everything here is
//! floating point; it is only read at construction time, where it is
//! turned into fixed-point limits and gain ratios.

use crate::error::{PidError, PidResult};
use crate::ratio::DEFAULT_MAX_ERROR;
use num_traits::float::FloatCore;

/// Largest derivative smoothing shift accepted.
pub const MAX_DERIVATIVE_SMOOTHING: u32 = 31;

/// Configuration for the fixed-point PID controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Proportional gain (kP). With the integral and derivative terms
    /// disabled, the output is `gain * (setpoint - measurement)`.
    pub gain: f32,
    /// Time after which the integral term of a constant error equals the
    /// proportional term. Zero or less disables the integral term.
    pub integral_time: f32,
    /// Time for which a constant rate of error change makes the derivative
    /// term equal the proportional term. Zero or less disables it.
    pub derivative_time: f32,
    /// Smallest setpoint the controller will be given.
    pub setpoint_min: f32,
    /// Largest setpoint the controller will be given.
    pub setpoint_max: f32,
    /// Smallest measurement expected.
    pub measurement_min: f32,
    /// Largest measurement expected.
    pub measurement_max: f32,
    /// Smallest output the actuator accepts.
    pub output_min: f32,
    /// Largest output the actuator accepts.
    pub output_max: f32,
    /// Largest expected cycle duration, in the same time unit as
    /// `integral_time` and `derivative_time`. The gain ratios are scaled
    /// for one cycle of this length.
    pub timestep_max: f32,
    /// Shift of the exponential filter on the derivative; each cycle the
    /// estimate moves `1 / 2^shift` of the way to the raw difference.
    /// Zero uses the raw difference.
    pub derivative_smoothing: u32,
    /// Largest relative error accepted for each gain ratio.
    pub max_ratio_error: f32,
}

impl Config {
    /// Creates a proportional-only configuration with unit gain, all ranges
    /// `[0, 100]` and a unit timestep. Adjust fields to match the plant.
    ///
    /// Example Usage
    /// ```
    /// use fixed_ratio_pid::{Config, Controller};
    ///
    /// let mut config = Config::new();
    ///
    /// // Gain and time constants, in seconds.
    /// config.gain = 15.0;
    /// config.integral_time = 85.0;
    /// config.derivative_time = 7.0;
    ///
    /// // The controller runs once a minute.
    /// config.timestep_max = 60.0;
    ///
    /// let pid = Controller::create(config);
    /// assert!(pid.is_ok());
    /// ```
    pub fn new() -> Self {
        Self {
            gain: 1.0,
            integral_time: 0.0,
            derivative_time: 0.0,
            setpoint_min: 0.0,
            setpoint_max: 100.0,
            measurement_min: 0.0,
            measurement_max: 100.0,
            output_min: 0.0,
            output_max: 100.0,
            timestep_max: 1.0,
            derivative_smoothing: 0,
            max_ratio_error: DEFAULT_MAX_ERROR,
        }
    }

    /// Checks every field against its allowed domain.
    pub fn validate(&self) -> PidResult<()> {
        let invalid = |what| Err(PidError::InvalidConfig { what });

        if !self.gain.is_finite() {
            return invalid("gain must be finite");
        }
        if !self.integral_time.is_finite() {
            return invalid("integral_time must be finite");
        }
        if !self.derivative_time.is_finite() {
            return invalid("derivative_time must be finite");
        }
        if !ordered_range(self.setpoint_min, self.setpoint_max) {
            return invalid("setpoint_min must not exceed setpoint_max");
        }
        if !ordered_range(self.measurement_min, self.measurement_max) {
            return invalid("measurement_min must not exceed measurement_max");
        }
        if !ordered_range(self.output_min, self.output_max) {
            return invalid("output_min must not exceed output_max");
        }
        if !(self.timestep_max.is_finite() && self.timestep_max > 0.0) {
            return invalid("timestep_max must be positive");
        }
        if self.derivative_smoothing > MAX_DERIVATIVE_SMOOTHING {
            return invalid("derivative_smoothing must be below 32");
        }
        if !(self.max_ratio_error.is_finite() && self.max_ratio_error > 0.0) {
            return invalid("max_ratio_error must be positive");
        }
        Ok(())
    }

    /// Integral gain `gain / integral_time`, zero when disabled.
    pub fn integral_gain(&self) -> f32 {
        if self.integral_time <= 0.0 {
            0.0
        } else {
            self.gain / self.integral_time
        }
    }

    /// Derivative gain `gain * derivative_time`, zero when disabled.
    pub fn derivative_gain(&self) -> f32 {
        if self.derivative_time <= 0.0 {
            0.0
        } else {
            self.gain * self.derivative_time
        }
    }

    /// Integral gain per cycle. The integrator sums raw error once per
    /// cycle, so the cycle length is folded into the gain.
    pub fn cycle_integral_gain(&self) -> f32 {
        self.integral_gain() * self.timestep_max
    }

    /// Derivative gain per cycle, applied to the error change over one cycle.
    pub fn cycle_derivative_gain(&self) -> f32 {
        self.derivative_gain() / self.timestep_max
    }

    /// Largest error magnitude the proportional term will see.
    pub fn max_abs_error(&self) -> f32 {
        let above = self.setpoint_max - self.measurement_min;
        let below = self.measurement_max - self.setpoint_min;
        above.max(below).max(0.0)
    }

    /// Integrator bound: the accumulated error at which the integral term
    /// alone spans twice the larger output magnitude. `None` when the
    /// integral term is disabled.
    pub fn integrator_clamp(&self) -> Option<f32> {
        let ki = self.cycle_integral_gain();
        if ki == 0.0 {
            return None;
        }
        let output_span = FloatCore::abs(self.output_min).max(FloatCore::abs(self.output_max));
        Some(2.0 * output_span / FloatCore::abs(ki))
    }

    /// Setpoint in effect until the first `set_setpoint`.
    pub fn initial_setpoint(&self) -> f32 {
        self.setpoint_min + (self.setpoint_max - self.setpoint_min) / 2.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn ordered_range(min: f32, max: f32) -> bool {
    min.is_finite() && max.is_finite() && min <= max
}
