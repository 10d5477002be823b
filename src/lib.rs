// src/lib.rs

//! # Fixed-Ratio PID Controller
//!
//! This crate provides a `no_std`, no-alloc PID (Proportional, Integral,
//! Derivative) controller that runs without floating-point arithmetic in
//! the control path. Floating-point tuning parameters are converted once,
//! at construction, into integer ratios of the form `numerator / 2^shift`
//! that are guaranteed not to overflow for the signal ranges the
//! controller was configured for. Every control cycle then reduces to
//! integer multiply, shift, saturating add and clamp.
//!
//! ## Usage
//!
//! ```
//! use fixed_ratio_pid::{Config, Controller, Fixed};
//!
//! let mut config = Config::new();
//! config.gain = 2.0;
//! config.integral_time = 8.0;
//! config.output_min = -100.0;
//! config.output_max = 100.0;
//!
//! let mut pid = Controller::create(config).expect("gains fit the configured ranges");
//! pid.set_setpoint(Fixed::from_num(50));
//! let output = pid.update(Fixed::from_num(45), Fixed::ONE);
//! assert!(output > Fixed::ZERO);
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod error;
pub mod fixed_point;
pub mod pid;
pub mod ratio;

#[doc(inline)]
pub use error::{Gain, PidError, PidResult, RatioError};
#[doc(inline)]
pub use fixed_point::Fixed;
#[doc(inline)]
pub use pid::*;
#[doc(inline)]
pub use ratio::Ratio;

#[cfg(test)]
mod test_utils;
