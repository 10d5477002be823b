// src/pid/telemetry.rs

//! # Controller Telemetry
//!
//! A [`Controller`](crate::Controller) reports a [`Diagnostics`] snapshot
//! to its telemetry sink at the end of every update. The snapshot is pure
//! observation: nothing recorded here feeds back into later cycles.

use crate::fixed_point::Fixed;

/// Values seen and computed during one control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Diagnostics {
    /// Setpoint in effect for the cycle.
    pub setpoint: Fixed,
    /// Measurement passed to the update.
    pub measurement: Fixed,
    /// Clamped error, `setpoint - measurement`.
    pub error: Fixed,
    /// Derivative estimate after smoothing.
    pub derr: Fixed,
    /// Proportional term.
    pub p: Fixed,
    /// Integral term.
    pub i: Fixed,
    /// Derivative term.
    pub d: Fixed,
    /// Integrator accumulator after the cycle.
    pub integrator: Fixed,
    /// Clamped output returned by the update.
    pub output: Fixed,
    /// Cycle duration passed to the update.
    pub dt: Fixed,
}

/// A sink for per-cycle controller diagnostics.
pub trait Telemetry {
    /// Called once per update with the cycle's diagnostics.
    fn record(&mut self, diagnostics: &Diagnostics);
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoTelemetry;

impl Telemetry for NoTelemetry {
    #[inline]
    fn record(&mut self, _diagnostics: &Diagnostics) {}
}

/// Emits each cycle as a `trace` record through the `log` facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTelemetry {
    /// Log target used for the records.
    pub target: &'static str,
}

impl LogTelemetry {
    /// Creates a sink logging under the crate's default target.
    pub const fn new() -> Self {
        Self {
            target: "fixed_ratio_pid",
        }
    }
}

impl Default for LogTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry for LogTelemetry {
    fn record(&mut self, d: &Diagnostics) {
        log::trace!(
            target: self.target,
            "sp={} pv={} err={} derr={} p={} i={} d={} integrator={} out={} dt={}",
            d.setpoint,
            d.measurement,
            d.error,
            d.derr,
            d.p,
            d.i,
            d.d,
            d.integrator,
            d.output,
            d.dt
        );
    }
}

impl<T: Telemetry + ?Sized> Telemetry for &mut T {
    #[inline]
    fn record(&mut self, diagnostics: &Diagnostics) {
        (**self).record(diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        count: usize,
        last_output: Fixed,
    }

    impl Telemetry for Counter {
        fn record(&mut self, diagnostics: &Diagnostics) {
            self.count += 1;
            self.last_output = diagnostics.output;
        }
    }

    fn record_twice<S: Telemetry>(mut sink: S, diagnostics: &Diagnostics) {
        sink.record(diagnostics);
        sink.record(diagnostics);
    }

    #[test]
    fn test_telemetry_forwards_through_mut_ref() {
        let mut counter = Counter::default();
        let diagnostics = Diagnostics {
            output: Fixed::from_num(7),
            ..Diagnostics::default()
        };
        record_twice(&mut counter, &diagnostics);
        assert_eq!(counter.count, 2);
        assert_eq!(counter.last_output, Fixed::from_num(7));
    }

    #[test]
    fn test_telemetry_log_sink_without_logger() {
        // With no logger installed the record is dropped silently.
        let mut sink = LogTelemetry::default();
        sink.record(&Diagnostics::default());
        assert_eq!(sink.target, "fixed_ratio_pid");
    }
}
