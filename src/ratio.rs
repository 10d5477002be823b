// src/ratio.rs

//! # Rational Approximation Module
//!
//! This module converts a real-valued coefficient into a [`Ratio`], an
//! integer numerator over a power-of-two denominator. Multiplying by a
//! ratio is a 32-bit integer multiply followed by an arithmetic shift,
//! which is what lets the controller run without floating point.
//!
//! A ratio is always built for a `max_multiplier`: the largest magnitude
//! it will ever be applied to. The search refuses any numerator whose
//! product with that bound would leave the `i32` range, so a ratio that
//! was successfully created can be applied to anything within its bound
//! without overflow.

use crate::error::RatioError;
use crate::fixed_point::Fixed;
use core::fmt;
use num_traits::float::FloatCore;

/// Default largest relative error accepted by [`Ratio::from_float`].
pub const DEFAULT_MAX_ERROR: f32 = 0.01;

/// Default relative error below which [`Ratio::from_float`] stops refining.
pub const DEFAULT_STOP_ERROR: f32 = 0.001;

/// Largest shift considered by the search.
pub const MAX_SHIFT: u32 = 31;

/// An integer ratio `numerator / 2^shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    numerator: i32,
    shift: u32,
    max_multiplier: u32,
}

/// A search candidate and its signed relative error.
#[derive(Clone, Copy)]
struct Candidate {
    numerator: i32,
    shift: u32,
    approx: f64,
    error: f64,
}

impl Candidate {
    /// Within-tolerance beats out-of-tolerance; otherwise the smaller
    /// error magnitude wins and ties keep the incumbent.
    fn beats(&self, best: &Candidate, max_error: f64) -> bool {
        let distance = FloatCore::abs(self.error);
        let best_distance = FloatCore::abs(best.error);
        match (distance <= max_error, best_distance <= max_error) {
            (true, false) => true,
            (false, true) => false,
            _ => distance < best_distance,
        }
    }
}

impl Ratio {
    /// The zero ratio. It multiplies everything to zero and can never overflow.
    pub const ZERO: Ratio = Ratio {
        numerator: 0,
        shift: 0,
        max_multiplier: u32::MAX,
    };

    /// Approximates `value` with the default tolerances
    /// ([`DEFAULT_MAX_ERROR`] and [`DEFAULT_STOP_ERROR`]).
    ///
    /// `max_multiplier` is the largest magnitude the ratio will be applied
    /// to. Applying it to anything larger may overflow; debug builds check.
    pub fn from_float(value: f32, max_multiplier: u32) -> Result<Self, RatioError> {
        Self::from_float_with_tolerance(
            value,
            max_multiplier,
            DEFAULT_MAX_ERROR,
            DEFAULT_STOP_ERROR,
        )
    }

    /// Approximates `value` as `numerator / 2^shift`.
    ///
    /// Shifts `0..=31` are tried in order. For each shift the numerator is
    /// `round(value * 2^shift)`; the first shift whose numerator times
    /// `max_multiplier` exceeds `i32::MAX` ends the search, since larger
    /// shifts only grow the numerator. The search also ends once the best
    /// relative error is below `stop_error`.
    ///
    /// # Errors
    /// * [`RatioError::Overflow`] if not even shift 0 fits the bound.
    /// * [`RatioError::Precision`] if the best candidate's relative error
    ///   exceeds `max_error`.
    /// * [`RatioError::NotFinite`] for NaN or infinite input.
    pub fn from_float_with_tolerance(
        value: f32,
        max_multiplier: u32,
        max_error: f32,
        stop_error: f32,
    ) -> Result<Self, RatioError> {
        if value == 0.0 {
            return Ok(Self::ZERO);
        }
        if !value.is_finite() {
            return Err(RatioError::NotFinite { value });
        }

        let exact = f64::from(value);
        let magnitude = FloatCore::abs(exact);
        let max_error_f64 = f64::from(max_error);
        let stop_error_f64 = f64::from(stop_error);
        let limit = i64::from(i32::MAX);
        let multiplier = i64::from(max_multiplier);

        let mut best: Option<Candidate> = None;
        for shift in 0..=MAX_SHIFT {
            let denominator = f64::from(1u32 << shift);
            let scaled = FloatCore::round(exact * denominator);
            if FloatCore::abs(scaled) > limit as f64 {
                break;
            }
            // |scaled| <= i32::MAX here, so the cast is exact.
            let numerator = scaled as i64;
            if numerator.abs() * multiplier > limit {
                break;
            }

            let numerator = numerator as i32;
            let approx = f64::from(numerator) / denominator;
            let candidate = Candidate {
                numerator,
                shift,
                approx,
                error: (approx - exact) / magnitude,
            };
            if best.map_or(true, |best| candidate.beats(&best, max_error_f64)) {
                best = Some(candidate);
            }
            if best.is_some_and(|best| FloatCore::abs(best.error) < stop_error_f64) {
                break;
            }
        }

        let Some(best) = best else {
            let numerator = FloatCore::round(exact) as i64;
            return Err(RatioError::Overflow {
                value,
                max_multiplier,
                numerator,
                product: numerator.saturating_abs().saturating_mul(multiplier),
                limit: i32::MAX,
            });
        };
        if FloatCore::abs(best.error) > max_error_f64 {
            return Err(RatioError::Precision {
                value,
                numerator: best.numerator,
                shift: best.shift,
                approx: best.approx,
                error: best.error,
                max_error,
            });
        }

        Ok(Ratio {
            numerator: best.numerator,
            shift: best.shift,
            max_multiplier,
        })
    }

    /// Numerator of the ratio.
    pub fn numerator(&self) -> i32 {
        self.numerator
    }

    /// Base-2 logarithm of the denominator.
    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Largest magnitude this ratio may be applied to.
    pub fn max_multiplier(&self) -> u32 {
        self.max_multiplier
    }

    /// The value the ratio realizes, for diagnostics.
    pub fn value(&self) -> f64 {
        f64::from(self.numerator) / f64::from(1u32 << self.shift)
    }

    /// Returns `(x * numerator) >> shift`.
    ///
    /// The shift is arithmetic, so negative products round toward negative
    /// infinity (`0.5` applied to `-3` is `-2`).
    ///
    /// `|x|` must not exceed [`max_multiplier`](Self::max_multiplier).
    /// Debug builds assert this; release builds skip the check and the
    /// product wraps if the bound is violated.
    #[inline]
    pub fn apply(self, x: i32) -> i32 {
        debug_assert!(
            self.numerator == 0 || x.unsigned_abs() <= self.max_multiplier,
            "ratio {} applied to {} beyond max_multiplier {}",
            self,
            x,
            self.max_multiplier
        );
        x.wrapping_mul(self.numerator) >> self.shift
    }

    /// Applies the ratio to the raw bits of a fixed-point value.
    #[inline]
    pub fn apply_fixed(self, x: Fixed) -> Fixed {
        Fixed::from_bits(self.apply(x.to_bits()))
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / 2^{} ~= {}", self.numerator, self.shift, self.value())
    }
}
