//! Time unit constants and counter width helpers.
//!
//! Durations throughout the crate are plain `u64` nanosecond counts; these
//! constants scale a count of the named unit into nanoseconds.

/// One nanosecond.
pub const NSECOND: u64 = 1;
/// One microsecond in nanoseconds.
pub const USECOND: u64 = 1_000;
/// One millisecond in nanoseconds.
pub const MSECOND: u64 = 1_000 * USECOND;
/// One second in nanoseconds.
pub const SECOND: u64 = 1_000 * MSECOND;

/// Longest wait a deadline can express, about 292 years.
///
/// Deadlines are compared on the signed difference of two nanosecond
/// stamps, so longer windows are clamped to this.
pub const MAX_WAIT_NS: u64 = u64::MAX >> 1;

/// Nanoseconds per second, as the conversion target frequency in Hz.
pub const NSEC_PER_SEC: u32 = 1_000_000_000;

/// Returns the mask for a counter that is `bits` wide.
///
/// `bits >= 64` yields `u64::MAX`; `0` yields `0`.
#[must_use]
pub const fn counter_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
