// src/test_utils.rs

//! This module contains utilities for testing.

use crate::{Diagnostics, Fixed, Telemetry};

/// A constant defining the tolerance within which floating-point values
/// are considered close enough to be equal.
pub const TEST_TOLERANCE: f32 = 1e-5;

/// Checks if two floating point numbers are close enough to be considered
/// equal.
///
/// # Arguments
/// * `target` - The target value.
/// * `value` - The value to compare against the target.
///
/// # Returns
/// `true` if the absolute difference between `target` and `value` is less than
/// `TEST_TOLERANCE`, otherwise `false`.
pub fn value_close(target: f32, value: f32) -> bool {
    (target - value).abs() < TEST_TOLERANCE
}

/// First-order lag plant: each step the state moves `rate` of the way
/// toward the applied input.
pub struct FirstOrderPlant {
    /// Current plant output.
    pub state: f32,
    /// Fraction of the gap closed per step.
    pub rate: f32,
}

impl FirstOrderPlant {
    /// Advances one step with `input` applied.
    pub fn step(&mut self, input: Fixed) {
        self.state += self.rate * (input.to_num::<f32>() - self.state);
    }

    /// Plant output as a controller measurement.
    pub fn measurement(&self) -> Fixed {
        Fixed::from_num(self.state)
    }
}

/// Telemetry sink keeping every snapshot.
#[derive(Default)]
pub struct Recorder {
    /// Snapshots in update order.
    pub samples: Vec<Diagnostics>,
}

impl Telemetry for Recorder {
    fn record(&mut self, diagnostics: &Diagnostics) {
        self.samples.push(*diagnostics);
    }
}
