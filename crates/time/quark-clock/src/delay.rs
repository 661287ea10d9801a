//! Timeouts and busy-wait delays.
//!
//! All of these spin on [`Clock::now_ns`]. There is no cancellation: a delay
//! runs until its deadline. The "interruptible" variants are not preemptible
//! either; they only call the scheduler hook while spinning so cooperative
//! pollers (USB, network) keep being serviced during long waits.

use crate::clock::Clock;
use crate::error::ClockError;
use crate::units::{MAX_WAIT_NS, MSECOND, USECOND};

impl Clock {
    /// Returns `true` once `duration_ns` has passed since `start_ns`.
    ///
    /// The comparison is done on the signed difference, so it stays correct
    /// even if the nanosecond counter itself wraps. Windows longer than
    /// [`MAX_WAIT_NS`] are clamped to it.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn is_timeout_raw(&self, start_ns: u64, duration_ns: u64) -> bool {
        let deadline = start_ns.wrapping_add(duration_ns.min(MAX_WAIT_NS));
        (deadline.wrapping_sub(self.now_ns()) as i64) < 0
    }

    /// Like [`is_timeout_raw`](Self::is_timeout_raw), and also yields to the
    /// scheduler hook when the wait is at least the configured yield
    /// threshold (100 µs by default).
    ///
    /// Short waits never yield, so microsecond delays stay tight.
    #[must_use]
    pub fn is_timeout(&self, start_ns: u64, duration_ns: u64) -> bool {
        let expired = self.is_timeout_raw(start_ns, duration_ns);
        if duration_ns >= self.config().yield_threshold_ns {
            self.yield_now();
        }
        expired
    }

    /// Spins for at least `ns` nanoseconds without yielding.
    ///
    /// Like every delay here, the wait is capped at [`MAX_WAIT_NS`].
    pub fn delay_ns(&self, ns: u64) {
        let start = self.now_ns();
        while !self.is_timeout_raw(start, ns) {
            core::hint::spin_loop();
        }
    }

    /// Spins for at least `us` microseconds, yielding on long waits.
    pub fn delay_us(&self, us: u64) {
        let start = self.now_ns();
        let duration = us.saturating_mul(USECOND);
        while !self.is_timeout(start, duration) {
            core::hint::spin_loop();
        }
    }

    /// Spins for at least `ms` milliseconds, yielding on long waits.
    pub fn delay_ms(&self, ms: u64) {
        self.delay_us(ms.saturating_mul(1000));
    }

    /// Spins for at least `ms` milliseconds without yielding.
    ///
    /// For callers that must not re-enter pollers, e.g. from inside one.
    pub fn delay_ms_raw(&self, ms: u64) {
        let start = self.now_ns();
        let duration = ms.saturating_mul(MSECOND);
        while !self.is_timeout_raw(start, duration) {
            core::hint::spin_loop();
        }
    }

    /// Polls `condition` until it holds or `duration_ns` has passed.
    ///
    /// The condition is checked once more after the deadline, so a device
    /// that became ready during the final wait still counts as ready.
    ///
    /// # Errors
    ///
    /// [`ClockError::Timeout`] if `condition` never returned `true`.
    pub fn wait_on_timeout(
        &self,
        duration_ns: u64,
        mut condition: impl FnMut() -> bool,
    ) -> Result<(), ClockError> {
        let start = self.now_ns();
        loop {
            if condition() {
                return Ok(());
            }
            if self.is_timeout(start, duration_ns) {
                return if condition() {
                    Ok(())
                } else {
                    Err(ClockError::Timeout)
                };
            }
        }
    }
}
