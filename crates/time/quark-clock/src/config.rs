//! Clock configuration.
//!
//! Board code picks these values at build time; [`ClockConfig::new`] is
//! `const` so a configuration can live in a `static`.

use crate::units::USECOND;

/// Default per-read step of the fallback counter, in nanoseconds.
pub const DEFAULT_FALLBACK_RATE: u64 = 1000;

/// Default wait length from which [`Clock::is_timeout`](crate::Clock::is_timeout)
/// yields to the scheduler hook.
pub const DEFAULT_YIELD_THRESHOLD_NS: u64 = 100 * USECOND;

/// Which firmware stage the clock runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootStage {
    /// The pre-bootloader: minimal code running from on-chip memory. No
    /// fallback source exists; a board must register a real counter before
    /// asking for time, and asking anyway is fatal.
    Pbl,
    /// The full bootloader. A software fallback source is installed up
    /// front so time queries always succeed.
    #[default]
    Proper,
}

/// Tunables for a [`Clock`](crate::Clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Firmware stage; decides whether a fallback source is installed.
    pub stage: BootStage,
    /// Nanoseconds the fallback counter advances on each read.
    pub fallback_rate: u64,
    /// Waits at least this long yield to the scheduler hook while spinning.
    pub yield_threshold_ns: u64,
}

impl ClockConfig {
    /// Returns the default configuration for the full bootloader.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: BootStage::Proper,
            fallback_rate: DEFAULT_FALLBACK_RATE,
            yield_threshold_ns: DEFAULT_YIELD_THRESHOLD_NS,
        }
    }

    /// Returns the configuration for the pre-bootloader stage.
    #[must_use]
    pub const fn pbl() -> Self {
        Self::new().with_stage(BootStage::Pbl)
    }

    /// Sets the firmware stage.
    #[must_use]
    pub const fn with_stage(mut self, stage: BootStage) -> Self {
        self.stage = stage;
        self
    }

    /// Sets the fallback counter's per-read step.
    #[must_use]
    pub const fn with_fallback_rate(mut self, rate: u64) -> Self {
        self.fallback_rate = rate;
        self
    }

    /// Sets the wait length from which delays yield.
    #[must_use]
    pub const fn with_yield_threshold(mut self, threshold_ns: u64) -> Self {
        self.yield_threshold_ns = threshold_ns;
        self
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClockConfig::default();
        assert_eq!(config.stage, BootStage::Proper);
        assert_eq!(config.fallback_rate, 1000);
        assert_eq!(config.yield_threshold_ns, 100_000);
    }

    #[test]
    fn builders() {
        const CONFIG: ClockConfig = ClockConfig::pbl()
            .with_fallback_rate(10)
            .with_yield_threshold(0);
        assert_eq!(CONFIG.stage, BootStage::Pbl);
        assert_eq!(CONFIG.fallback_rate, 10);
        assert_eq!(CONFIG.yield_threshold_ns, 0);
    }
}
