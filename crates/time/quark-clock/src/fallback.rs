//! Software fallback clock source.
//!
//! Guarantees a clock exists before any hardware timer driver has probed.
//! Every read advances a software counter by a fixed step, so time only
//! moves when someone looks at it: delays still terminate, they are just
//! not calibrated to real time.

use alloc::boxed::Box;

use crate::calc::Scale;
use crate::source::{ClockSource, Counter};

/// Name the fallback source registers under.
pub const FALLBACK_NAME: &str = "dummy";

/// Priority of the fallback source, below any hardware source.
pub const FALLBACK_PRIORITY: i32 = -1;

/// Counter that advances by `rate` on every read.
#[derive(Debug, Clone, Copy)]
pub struct FallbackCounter {
    value: u64,
    rate: u64,
}

impl FallbackCounter {
    /// Creates a counter at zero advancing `rate` per read.
    #[must_use]
    pub const fn new(rate: u64) -> Self {
        Self { value: 0, rate }
    }
}

impl Counter for FallbackCounter {
    fn read(&mut self) -> u64 {
        self.value = self.value.wrapping_add(self.rate);
        self.value
    }
}

impl ClockSource {
    /// Creates the fallback source: full 64-bit mask, one tick per
    /// nanosecond, and [`FALLBACK_PRIORITY`].
    #[must_use]
    pub fn fallback(rate: u64) -> Self {
        Self::new(
            FALLBACK_NAME,
            Box::new(FallbackCounter::new(rate)),
            u64::MAX,
            Scale::IDENTITY,
            FALLBACK_PRIORITY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_rate_per_read() {
        let mut counter = FallbackCounter::new(1000);
        assert_eq!(counter.read(), 1000);
        assert_eq!(counter.read(), 2000);
    }

    #[test]
    fn fallback_source_shape() {
        let mut cs = ClockSource::fallback(250);
        assert!(cs.is_fallback());
        assert_eq!(cs.name(), FALLBACK_NAME);
        cs.rebase();
        assert_eq!(cs.cycle_last(), 250);
        assert_eq!(cs.elapsed_ns(), 250);
        assert_eq!(cs.elapsed_ns(), 250);
    }
}
