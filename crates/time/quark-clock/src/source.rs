//! Clock sources: one free-running counter plus its conversion factors.

use alloc::boxed::Box;

use crate::calc::{Scale, compute_mult_shift};
use crate::error::ClockError;
use crate::units::{NSEC_PER_SEC, counter_mask};

/// Longest conversion range, in seconds, a solved scale has to cover.
const MAX_CONVERSION_SECS: u64 = 600;

/// A raw hardware (or software) free-running counter.
///
/// Implemented once per counter by its driver. The value returned by
/// [`read`](Counter::read) may wrap at any width; the owning
/// [`ClockSource`] masks it.
pub trait Counter: Send {
    /// Returns the current raw counter value.
    fn read(&mut self) -> u64;

    /// Brings the hardware up. Called exactly once, before the first
    /// [`read`](Counter::read) that counts towards elapsed time.
    ///
    /// A driver that only learns its input frequency here may overwrite
    /// `scale`.
    ///
    /// # Errors
    ///
    /// Any error discards the source; the clock reports it as
    /// [`ClockError::InitFailed`].
    fn init(&mut self, scale: &mut Scale) -> Result<(), ClockError> {
        let _ = scale;
        Ok(())
    }
}

/// One counter together with its width mask, scale and priority.
pub struct ClockSource {
    name: &'static str,
    counter: Box<dyn Counter>,
    mask: u64,
    scale: Scale,
    priority: i32,
    cycle_last: u64,
}

impl ClockSource {
    /// Creates a source with an explicit mask and scale.
    ///
    /// A strictly negative `priority` marks a last-resort software source.
    #[must_use]
    pub fn new(
        name: &'static str,
        counter: Box<dyn Counter>,
        mask: u64,
        scale: Scale,
        priority: i32,
    ) -> Self {
        Self {
            name,
            counter,
            mask,
            scale,
            priority,
            cycle_last: 0,
        }
    }

    /// Creates a source for a `bits`-wide counter ticking at `hz`.
    ///
    /// The scale is solved to cover one full wrap period of the counter,
    /// clamped to between one second and ten minutes.
    ///
    /// # Errors
    ///
    /// [`ClockError::InvalidFrequency`] if `hz` is zero,
    /// [`ClockError::InvalidWidth`] if `bits` is not in `1..=64`.
    pub fn with_frequency(
        name: &'static str,
        counter: Box<dyn Counter>,
        bits: u32,
        hz: u32,
        priority: i32,
    ) -> Result<Self, ClockError> {
        if hz == 0 {
            return Err(ClockError::InvalidFrequency);
        }
        if bits == 0 || bits > 64 {
            return Err(ClockError::InvalidWidth);
        }

        let mask = counter_mask(bits);
        let wrap_secs = (mask / u64::from(hz)).clamp(1, MAX_CONVERSION_SECS);
        // Clamped to at most 600 above.
        #[allow(clippy::cast_possible_truncation)]
        let scale = compute_mult_shift(hz, NSEC_PER_SEC, wrap_secs as u32);

        Ok(Self::new(name, counter, mask, scale, priority))
    }

    /// Returns the source's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the selection priority. Higher wins.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns `true` for last-resort software sources (negative priority).
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.priority < 0
    }

    /// Returns the counter width mask.
    #[must_use]
    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Returns the cycle-to-nanosecond scale.
    #[must_use]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Returns the masked counter value seen at the last conversion.
    #[must_use]
    pub fn cycle_last(&self) -> u64 {
        self.cycle_last
    }

    /// Runs the counter's one-time bring-up.
    pub(crate) fn init(&mut self) -> Result<(), ClockError> {
        self.counter.init(&mut self.scale)
    }

    /// Reads the counter and applies the width mask.
    #[inline]
    pub fn read_masked(&mut self) -> u64 {
        self.counter.read() & self.mask
    }

    /// Returns the cycles elapsed between `cycle_last` and `raw`.
    ///
    /// The subtraction wraps in the counter's own modulus, so a counter that
    /// rolled over past its mask still yields the small forward distance.
    #[must_use]
    #[inline]
    pub fn delta(&self, raw: u64) -> u64 {
        raw.wrapping_sub(self.cycle_last) & self.mask
    }

    /// Takes the current counter value as the new baseline.
    ///
    /// A counter may have been running long before it was handed to the
    /// clock; only cycles after this point count.
    pub fn rebase(&mut self) {
        self.cycle_last = self.read_masked();
    }

    /// Reads the counter and returns the nanoseconds elapsed since the last
    /// call, advancing the baseline.
    pub fn elapsed_ns(&mut self) -> u64 {
        let raw = self.read_masked();
        let delta = self.delta(raw);
        self.cycle_last = raw;
        self.scale.cycles_to_ns(delta)
    }
}

impl core::fmt::Debug for ClockSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClockSource")
            .field("name", &self.name)
            .field("mask", &format_args!("{:#x}", self.mask))
            .field("scale", &self.scale)
            .field("priority", &self.priority)
            .field("cycle_last", &self.cycle_last)
            .finish_non_exhaustive()
    }
}
