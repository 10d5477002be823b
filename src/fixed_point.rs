// src/fixed_point.rs

//! # Fixed-Point Signal Type
//!
//! The controller carries setpoints, measurements, errors, the integrator
//! and its output as [`Fixed`], a 32-bit signed fixed-point number with
//! 8 fractional bits. Gain ratios are applied to the raw two's-complement
//! bits of these values, so any multiplier bound handed to
//! [`Ratio::from_float`](crate::Ratio::from_float) for a signal is that
//! signal's magnitude in raw units.
//!
//! All signal arithmetic inside the controller saturates at
//! [`Fixed::MIN`] and [`Fixed::MAX`] rather than wrapping.

use fixed::types::I24F8;

/// Fixed-point signal type: range about ±8.4e6, resolution 1/256.
pub type Fixed = I24F8;

/// Number of fractional bits in [`Fixed`].
const FRAC_BITS: u32 = 8;

const _: () = assert!(Fixed::FRAC_NBITS == FRAC_BITS);

/// Converts a finite `f32` into [`Fixed`], saturating at the type bounds.
/// Infinities saturate, NaN maps to zero.
pub fn saturating_from_f32(value: f32) -> Fixed {
    if value.is_nan() {
        Fixed::ZERO
    } else {
        Fixed::saturating_from_num(value)
    }
}

/// Magnitude of `value` in raw units (`value × 2^8`), the unit ratio
/// bounds are expressed in.
pub fn raw_magnitude(value: Fixed) -> u32 {
    value.to_bits().unsigned_abs()
}

/// Clamps `value` into `[-limit, limit]`. `limit` must be non-negative.
pub fn clamp_symmetric(value: Fixed, limit: Fixed) -> Fixed {
    value.clamp(-limit, limit)
}
