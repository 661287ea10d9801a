//! Fixed-point frequency conversion.
//!
//! A counter running at `f` Hz is converted to nanoseconds without floating
//! point by representing `1e9 / f` as `mult / 2^shift`:
//!
//! ```text
//! ns = (cycles * mult) >> shift
//! ```
//!
//! A larger `shift` gives a more precise `mult`, but also a larger product,
//! so the largest usable shift depends on how many cycles may be converted at
//! once. [`compute_mult_shift`] solves that trade-off for a given range.

use crate::units::NSEC_PER_SEC;

/// A multiplier/shift pair for `(cycles * mult) >> shift` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    /// Fixed-point multiplier.
    pub mult: u32,
    /// Right shift applied after the multiply.
    pub shift: u32,
}

impl Scale {
    /// The 1:1 scale: one cycle is one nanosecond.
    pub const IDENTITY: Self = Self::new(1, 0);

    /// Creates a scale from an explicit multiplier and shift.
    #[must_use]
    pub const fn new(mult: u32, shift: u32) -> Self {
        Self { mult, shift }
    }

    /// Creates a scale for a counter at `hz` with a build-time `shift`.
    ///
    /// See [`hz_to_mult`].
    #[must_use]
    pub const fn from_hz(hz: u32, shift: u32) -> Self {
        Self::new(hz_to_mult(hz, shift), shift)
    }

    /// Converts a cycle count to nanoseconds.
    ///
    /// The multiply is widened to 128 bits so it cannot overflow even when
    /// `cycles` exceeds the range the scale was solved for; only the final
    /// value is truncated back to 64 bits.
    ///
    /// Useful shifts are below 64. Any larger shift, including one of 128 or
    /// more written by a driver's bring-up, converts every count to zero.
    #[must_use]
    #[inline]
    // Truncation to 64 bits is the documented result for out-of-range counts.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn cycles_to_ns(self, cycles: u64) -> u64 {
        let product = cycles as u128 * self.mult as u128;
        match product.checked_shr(self.shift) {
            Some(ns) => ns as u64,
            None => 0,
        }
    }
}

/// Computes a [`Scale`] converting `from_hz` ticks into `to_hz` units.
///
/// The result guarantees that any cycle count accumulated over at most
/// `max_secs` seconds at `from_hz` can be multiplied by `mult` without
/// overflowing 64 bits, and has the largest `shift` for which that holds.
///
/// For a clock source `to_hz` is [`NSEC_PER_SEC`]. `from_hz` must be
/// non-zero; [`ClockSource::with_frequency`](crate::ClockSource::with_frequency)
/// rejects zero before calling this.
#[must_use]
pub const fn compute_mult_shift(from_hz: u32, to_hz: u32, max_secs: u32) -> Scale {
    let from = from_hz as u64;

    // Bits of the product consumed by the largest count in range.
    let mut sftacc = 32u32;
    let mut tmp = (max_secs as u64 * from) >> 32;
    while tmp != 0 {
        tmp >>= 1;
        sftacc -= 1;
    }

    // Largest shift whose multiplier still fits in the remaining bits.
    let mut shift = 32u32;
    let mut mult = 0u64;
    while shift > 0 {
        mult = ((to_hz as u64) << shift) + from / 2;
        mult /= from;
        if mult >> sftacc == 0 {
            break;
        }
        shift -= 1;
    }

    // Fits in 32 bits whenever a shift was accepted, since `sftacc <= 32`.
    #[allow(clippy::cast_possible_truncation)]
    let mult = mult as u32;
    Scale::new(mult, shift)
}

/// Derives a multiplier for a counter at `hz` and a fixed `shift`.
///
/// `mult = round((1e9 << shift) / hz)`. Used when a driver fixes the shift
/// at build time instead of solving it for a range.
///
/// The result is truncated to 32 bits; callers pick a `shift` small enough
/// for `hz` that the multiplier fits.
#[must_use]
// Truncation is the documented behavior for oversized shifts.
#[allow(clippy::cast_possible_truncation)]
pub const fn hz_to_mult(hz: u32, shift: u32) -> u32 {
    let hz = hz as u128;
    let tmp = ((NSEC_PER_SEC as u128) << shift) + hz / 2;
    (tmp / hz) as u32
}
