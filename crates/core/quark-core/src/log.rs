//! Log output bridge for firmware.
//!
//! quark crates log through the [`log`] facade. This module provides the
//! facade's backend: a [`log::Log`] implementation that forwards every
//! enabled record to a plain sink function registered by the board (usually
//! an early UART writer). Before [`init`] or [`set_log_fn`] is called,
//! output is silently discarded.

use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

// ---------------------------------------------------------------------------
// Sink registration
// ---------------------------------------------------------------------------

/// The signature of the registered log sink.
pub type LogFn = fn(Level, fmt::Arguments<'_>);

fn null_log(_level: Level, _args: fmt::Arguments<'_>) {}

static LOG_FN: AtomicPtr<()> = AtomicPtr::new(null_log as *mut ());

/// Registers the sink that receives every enabled log record.
///
/// May be called more than once (e.g., once for an early polled UART, once
/// for the full console). Uses `Release` ordering so subsequent loads see
/// the new function.
pub fn set_log_fn(f: LogFn) {
    LOG_FN.store(f as *mut (), Ordering::Release);
}

/// Loads the current sink from the atomic pointer.
#[inline]
fn load_log_fn() -> LogFn {
    let ptr = LOG_FN.load(Ordering::Acquire);
    // SAFETY: We only ever store valid `LogFn` function pointers into LOG_FN.
    unsafe { core::mem::transmute::<*mut (), LogFn>(ptr) }
}

/// Returns the human-readable level name (fixed-width for aligned output).
#[must_use]
pub const fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN ",
        Level::Info => "INFO ",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

// ---------------------------------------------------------------------------
// `log` facade backend
// ---------------------------------------------------------------------------

struct SinkLogger;

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            load_log_fn()(record.level(), *record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: SinkLogger = SinkLogger;

/// Installs the sink logger as the global [`log`] backend.
///
/// Registers `sink` and sets the facade's maximum level. Records more verbose
/// than `max_level` are filtered before they reach the sink.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if another logger was already installed. The
/// sink is still registered in that case, so a second call from the same
/// firmware image only swaps the output function.
pub fn init(sink: LogFn, max_level: LevelFilter) -> Result<(), SetLoggerError> {
    set_log_fn(sink);
    log::set_logger(&LOGGER)?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_fixed_width() {
        for level in [
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Debug,
            Level::Trace,
        ] {
            assert_eq!(level_name(level).len(), 5);
        }
        assert_eq!(level_name(Level::Warn).trim_end(), "WARN");
    }
}
