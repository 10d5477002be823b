// src/error.rs

//! Error types for ratio approximation and controller construction.
//!
//! All failures happen while building a [`Controller`](crate::Controller).
//! Once built, a controller never fails: every numeric extreme is absorbed
//! by saturation and clamping.

use core::fmt;
use thiserror::Error;

/// Result type for controller construction.
pub type PidResult<T> = Result<T, PidError>;

/// Failure to approximate a value as `numerator / 2^shift`.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RatioError {
    /// Even at shift 0 the numerator times the multiplier bound overflows `i32`.
    #[error(
        "cannot find any ratio for {value}: max_multiplier {max_multiplier} is too large \
         (numerator {numerator} / 2^0 gives product {product} > {limit})"
    )]
    Overflow {
        /// Value being approximated.
        value: f32,
        /// Largest magnitude the ratio was required to multiply.
        max_multiplier: u32,
        /// Rounded numerator at shift 0.
        numerator: i64,
        /// `|numerator| * max_multiplier`.
        product: i64,
        /// Largest product allowed (`i32::MAX`).
        limit: i32,
    },

    /// The best ratio found still misses the value by more than `max_error`.
    #[error(
        "cannot find ratio for {value} with low enough relative error: \
         best {numerator} / 2^{shift} ~= {approx} err={error} max_err={max_error}"
    )]
    Precision {
        /// Value being approximated.
        value: f32,
        /// Numerator of the best candidate.
        numerator: i32,
        /// Shift of the best candidate.
        shift: u32,
        /// Value the best candidate realizes.
        approx: f64,
        /// Signed relative error of the best candidate.
        error: f64,
        /// Relative error tolerance that was exceeded.
        max_error: f32,
    },

    /// NaN and infinities have no ratio.
    #[error("cannot approximate non-finite value {value}")]
    NotFinite {
        /// Value being approximated.
        value: f32,
    },
}

/// Identifies one of the three controller gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// Proportional gain.
    Kp,
    /// Integral gain.
    Ki,
    /// Derivative gain.
    Kd,
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gain::Kp => "kP",
            Gain::Ki => "kI",
            Gain::Kd => "kD",
        })
    }
}

/// Errors returned by [`Controller::create`](crate::Controller::create).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum PidError {
    /// A gain could not be turned into a ratio.
    #[error("failed to compute {gain} ratio: {source}")]
    Gain {
        /// Gain that failed.
        gain: Gain,
        /// Approximation failure.
        #[source]
        source: RatioError,
    },

    /// A configuration field is out of its allowed domain.
    #[error("invalid config: {what}")]
    InvalidConfig {
        /// Description of the offending field.
        what: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_gain_names() {
        assert_eq!(Gain::Kp.to_string(), "kP");
        assert_eq!(Gain::Ki.to_string(), "kI");
        assert_eq!(Gain::Kd.to_string(), "kD");
    }

    #[test]
    fn test_error_message_names_gain_and_inputs() {
        let error = PidError::Gain {
            gain: Gain::Ki,
            source: RatioError::Precision {
                value: 0.3,
                numerator: 5,
                shift: 4,
                approx: 0.3125,
                error: 0.0417,
                max_error: 0.01,
            },
        };
        let message = error.to_string();
        assert!(message.contains("kI"), "{message}");
        assert!(message.contains("0.3"), "{message}");
        assert!(message.contains("5 / 2^4"), "{message}");
        assert!(message.contains("max_err=0.01"), "{message}");
    }
}
