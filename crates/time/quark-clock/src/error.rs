//! Clock error types.

use core::fmt;

/// Errors reported by clock registration, construction and waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// A clock source's one-time hardware bring-up failed.
    ///
    /// The source is discarded; the previously active source stays active.
    InitFailed,
    /// Time was queried before any clock source existed.
    NoClockSource,
    /// A counter frequency of zero was supplied.
    InvalidFrequency,
    /// A counter width outside `1..=64` bits was supplied.
    InvalidWidth,
    /// A polled condition did not become true before its deadline.
    Timeout,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => f.write_str("clock source initialization failed"),
            Self::NoClockSource => f.write_str("no clock source available"),
            Self::InvalidFrequency => f.write_str("clock source frequency is zero"),
            Self::InvalidWidth => f.write_str("counter width must be 1 to 64 bits"),
            Self::Timeout => f.write_str("timed out"),
        }
    }
}

impl core::error::Error for ClockError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_all_variants() {
        assert_eq!(
            format!("{}", ClockError::InitFailed),
            "clock source initialization failed"
        );
        assert_eq!(
            format!("{}", ClockError::NoClockSource),
            "no clock source available"
        );
        assert_eq!(
            format!("{}", ClockError::InvalidFrequency),
            "clock source frequency is zero"
        );
        assert_eq!(
            format!("{}", ClockError::InvalidWidth),
            "counter width must be 1 to 64 bits"
        );
        assert_eq!(format!("{}", ClockError::Timeout), "timed out");
    }
}
