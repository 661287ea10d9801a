//! Nanosecond accumulator.
//!
//! The clock never converts an absolute counter value. Each query converts
//! only the cycles elapsed since the previous query and adds them to a
//! running total, so a narrow counter may wrap any number of times over the
//! life of the clock as long as it is sampled at least once per wrap period.

use crate::source::ClockSource;

/// Accumulated nanoseconds since the clock's inception.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Monotonic {
    time_ns: u64,
}

impl Monotonic {
    /// Creates an accumulator at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { time_ns: 0 }
    }

    /// Returns the accumulated time without sampling a source.
    #[must_use]
    pub const fn last_ns(&self) -> u64 {
        self.time_ns
    }

    /// Samples `source` and adds the nanoseconds elapsed since its previous
    /// sample. Returns the new total.
    pub fn advance(&mut self, source: &mut ClockSource) -> u64 {
        self.time_ns = self.time_ns.wrapping_add(source.elapsed_ns());
        self.time_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::Scale;
    use crate::source::Counter;
    use alloc::boxed::Box;

    /// Replays a fixed list of raw values.
    struct Script(&'static [u64], usize);

    impl Counter for Script {
        fn read(&mut self) -> u64 {
            let value = self.0[self.1.min(self.0.len() - 1)];
            self.1 += 1;
            value
        }
    }

    #[test]
    fn accumulates_through_repeated_wraps() {
        // 8-bit counter, 10 ns per cycle, wrapping three times.
        let raws = &[200, 50, 150, 10, 255, 0];
        let mut cs = ClockSource::new(
            "byte",
            Box::new(Script(raws, 0)),
            0xFF,
            Scale::new(10, 0),
            1,
        );
        cs.rebase();

        let mut clock = Monotonic::new();
        let mut seen = alloc::vec::Vec::new();
        for _ in 1..raws.len() {
            seen.push(clock.advance(&mut cs));
        }
        // Deltas: 106, 100, 116, 245, 1 cycles.
        assert_eq!(seen, [1060, 2060, 3220, 5670, 5680]);
        assert_eq!(clock.last_ns(), 5680);
    }

    #[test]
    fn non_decreasing_for_a_stalled_counter() {
        let mut cs = ClockSource::new(
            "stuck",
            Box::new(Script(&[7], 0)),
            u64::MAX,
            Scale::IDENTITY,
            1,
        );
        cs.rebase();
        let mut clock = Monotonic::new();
        assert_eq!(clock.advance(&mut cs), 0);
        assert_eq!(clock.advance(&mut cs), 0);
    }
}
