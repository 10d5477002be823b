// src/pid/controller.rs

//! # Fixed-Point PID Controller
//!
//! The controller owns three gain [`Ratio`]s and runs each cycle using
//! only integer multiply, shift, saturating add and clamp. All fallible
//! work happens in [`Controller::create`]: once a controller exists,
//! [`Controller::update`] always returns an output inside the configured
//! output range, whatever measurement it is fed.
//!
//! ## Cycle time
//!
//! The cycle time is baked into the gain ratios through
//! [`Config::timestep_max`]. The integrator adds the raw error once per
//! cycle and the derivative is the change in error over one cycle. The
//! `dt` passed to [`Controller::update`] is recorded in the diagnostics
//! but does not rescale the terms; running the loop at a different rate
//! than `timestep_max` is the caller's responsibility.
//!
//! ## Anti-windup
//!
//! The integrator only advances while the proportional and derivative
//! terms alone leave the output unsaturated, or saturate it against the
//! direction the integral term pushes, or the integrator is zero. With a
//! negative gain that direction is opposite to the integrator's sign. The
//! integrator is always kept within the clamp derived from the output
//! range.
//!
//! ## Concurrency
//!
//! A controller assumes a single writer. If it is shared between an
//! interrupt handler and normal code, the caller must serialize access.

use crate::error::{Gain, PidError, PidResult};
use crate::fixed_point::{clamp_symmetric, raw_magnitude, saturating_from_f32, Fixed};
use crate::pid::config::Config;
use crate::pid::telemetry::{Diagnostics, NoTelemetry, Telemetry};
use crate::ratio::Ratio;

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No setpoint has been given; updates track the midpoint of the
    /// configured setpoint range.
    Uninitialized,
    /// A setpoint has been given.
    Running,
}

/// Fixed-point PID controller with anti-windup.
#[derive(Debug, Clone)]
pub struct Controller<S: Telemetry = NoTelemetry> {
    kp: Ratio,
    ki: Ratio,
    kd: Ratio,
    error_limit: Fixed,
    swing_limit: Fixed,
    integrator_clamp: Option<Fixed>,
    output_min: Fixed,
    output_max: Fixed,
    derivative_smoothing: u32,

    state: ControllerState,
    setpoint: Fixed,
    integrator: Fixed,
    prev_err: Fixed,
    derr: Fixed,

    diagnostics: Diagnostics,
    telemetry: S,
}

impl Controller {
    /// Creates a controller without telemetry.
    ///
    /// # Errors
    /// [`PidError::InvalidConfig`] for an out-of-domain configuration, or
    /// [`PidError::Gain`] naming the gain whose ratio could not be built.
    pub fn create(config: Config) -> PidResult<Self> {
        Self::with_telemetry(config, NoTelemetry)
    }
}

impl<S: Telemetry> Controller<S> {
    /// Creates a controller reporting every cycle to `telemetry`.
    ///
    /// Each gain ratio is bounded by the largest value it will multiply:
    /// kP by the largest error, kI by the integrator clamp, and kD by twice
    /// the largest error (a full swing from one extreme to the other).
    pub fn with_telemetry(config: Config, telemetry: S) -> PidResult<Self> {
        config.validate()?;

        let error_limit = saturating_from_f32(config.max_abs_error());
        let swing_limit = error_limit.saturating_add(error_limit);
        let integrator_clamp = config.integrator_clamp().map(|clamp| {
            let limit = saturating_from_f32(clamp);
            if limit == Fixed::MAX {
                log::warn!(
                    "integrator clamp {} exceeds the fixed-point range, saturating to {}",
                    clamp,
                    Fixed::MAX
                );
            }
            limit
        });

        let max_error = config.max_ratio_error;
        let kp = gain_ratio(Gain::Kp, config.gain, raw_magnitude(error_limit), max_error)?;
        let ki = match integrator_clamp {
            Some(limit) => gain_ratio(
                Gain::Ki,
                config.cycle_integral_gain(),
                raw_magnitude(limit),
                max_error,
            )?,
            None => Ratio::ZERO,
        };
        let kd = gain_ratio(
            Gain::Kd,
            config.cycle_derivative_gain(),
            raw_magnitude(swing_limit),
            max_error,
        )?;

        log::debug!("kP = {kp}, kI = {ki}, kD = {kd}");
        log::debug!(
            "error limit {error_limit}, swing limit {swing_limit}, integrator clamp {integrator_clamp:?}"
        );

        Ok(Self {
            kp,
            ki,
            kd,
            error_limit,
            swing_limit,
            integrator_clamp,
            output_min: saturating_from_f32(config.output_min),
            output_max: saturating_from_f32(config.output_max),
            derivative_smoothing: config.derivative_smoothing,
            state: ControllerState::Uninitialized,
            setpoint: saturating_from_f32(config.initial_setpoint()),
            integrator: Fixed::ZERO,
            prev_err: Fixed::ZERO,
            derr: Fixed::ZERO,
            diagnostics: Diagnostics::default(),
            telemetry,
        })
    }

    /// Changes the setpoint.
    ///
    /// The previous error is shifted by the same amount so that the change
    /// does not show up as a one-cycle derivative spike.
    pub fn set_setpoint(&mut self, setpoint: Fixed) {
        let delta = setpoint.saturating_sub(self.setpoint);
        self.setpoint = setpoint;
        self.prev_err = self.prev_err.saturating_add(delta);
        self.state = ControllerState::Running;
    }

    /// Runs one control cycle and returns the clamped output.
    pub fn update(&mut self, measurement: Fixed, dt: Fixed) -> Fixed {
        // Keep every multiplicand within the bound its ratio was built for.
        let err = clamp_symmetric(self.setpoint.saturating_sub(measurement), self.error_limit);
        let raw_derr = clamp_symmetric(err.saturating_sub(self.prev_err), self.swing_limit);
        self.prev_err = err;
        self.derr = smooth(self.derr, raw_derr, self.derivative_smoothing);

        let p = self.kp.apply_fixed(err);
        let d = self.kd.apply_fixed(self.derr);
        let pd = p.saturating_add(d);

        if let Some(clamp) = self.integrator_clamp {
            if self.may_integrate(pd) {
                self.integrator = self.integrator.saturating_add(err);
            }
            self.integrator = clamp_symmetric(self.integrator, clamp);
        }
        let i = self.ki.apply_fixed(self.integrator);

        let output = p
            .saturating_add(i)
            .saturating_add(d)
            .clamp(self.output_min, self.output_max);

        self.diagnostics = Diagnostics {
            setpoint: self.setpoint,
            measurement,
            error: err,
            derr: self.derr,
            p,
            i,
            d,
            integrator: self.integrator,
            output,
            dt,
        };
        self.telemetry.record(&self.diagnostics);

        output
    }

    /// Clears the integrator, e.g. while the actuator is disabled.
    pub fn reset_integrator(&mut self) {
        self.integrator = Fixed::ZERO;
    }

    fn may_integrate(&self, pd: Fixed) -> bool {
        // Direction the integral term pushes the output; ki may be negative.
        let push = self.integrator.to_bits().signum() * self.ki.numerator().signum();
        if push == 0 {
            true
        } else if pd > self.output_max {
            push < 0
        } else if pd < self.output_min {
            push > 0
        } else {
            true
        }
    }

    /// Current setpoint.
    pub fn setpoint(&self) -> Fixed {
        self.setpoint
    }

    /// Integrator accumulator, in error units summed per cycle.
    pub fn integrator(&self) -> Fixed {
        self.integrator
    }

    /// Error seen by the last update, adjusted for later setpoint changes.
    pub fn previous_error(&self) -> Fixed {
        self.prev_err
    }

    /// Derivative estimate used by the last update.
    pub fn derr(&self) -> Fixed {
        self.derr
    }

    /// Diagnostics of the last update.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Proportional gain ratio.
    pub fn kp(&self) -> Ratio {
        self.kp
    }

    /// Integral gain ratio, per cycle.
    pub fn ki(&self) -> Ratio {
        self.ki
    }

    /// Derivative gain ratio, per cycle.
    pub fn kd(&self) -> Ratio {
        self.kd
    }

    /// Integrator bound, `None` when the integral term is disabled.
    pub fn integrator_clamp(&self) -> Option<Fixed> {
        self.integrator_clamp
    }

    /// Output bounds as `(min, max)`.
    pub fn output_range(&self) -> (Fixed, Fixed) {
        (self.output_min, self.output_max)
    }

    /// Lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Telemetry sink.
    pub fn telemetry(&self) -> &S {
        &self.telemetry
    }

    /// Mutable telemetry sink.
    pub fn telemetry_mut(&mut self) -> &mut S {
        &mut self.telemetry
    }

    /// Consumes the controller, returning its telemetry sink.
    pub fn into_telemetry(self) -> S {
        self.telemetry
    }
}

fn gain_ratio(gain: Gain, value: f32, max_multiplier: u32, max_error: f32) -> PidResult<Ratio> {
    Ratio::from_float_with_tolerance(value, max_multiplier, max_error, max_error / 10.0)
        .map_err(|source| PidError::Gain { gain, source })
}

/// Moves `current` a `1 / 2^shift` step toward `target`, snapping to
/// `target` once the step rounds to zero.
fn smooth(current: Fixed, target: Fixed, shift: u32) -> Fixed {
    if shift == 0 {
        return target;
    }
    let gap = i64::from(target.to_bits()) - i64::from(current.to_bits());
    let step = gap >> shift;
    if step == 0 {
        target
    } else {
        // The step never passes target, so the sum stays in range.
        Fixed::from_bits((i64::from(current.to_bits()) + step) as i32)
    }
}
