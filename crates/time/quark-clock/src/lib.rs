//! Monotonic time for pre-OS firmware.
//!
//! Turns raw free-running hardware counters of any frequency and width into
//! one nanosecond-resolution monotonic clock, and builds busy-wait delays on
//! top of it.
//!
//! # Overview
//!
//! - A [`Counter`] is the driver-side capability: read a raw value, and
//!   optionally bring the hardware up once.
//! - A [`ClockSource`] wraps a counter with its width mask, its fixed-point
//!   [`Scale`] and a selection priority.
//! - A [`Clock`] is the context object owned by start-up code. It keeps the
//!   highest-priority registered source active and accumulates elapsed
//!   nanoseconds across counter wraps and source switches.
//! - The delay family ([`Clock::delay_us`] and friends) spins on the clock,
//!   optionally yielding to a cooperative scheduler hook on long waits.
//!
//! # Usage
//!
//! ```ignore
//! let clock = Clock::new(ClockConfig::new());
//! clock.register(ClockSource::with_frequency("gpt", Box::new(gpt), 32, 24_000_000, 100)?)?;
//! clock.delay_ms(10);
//! let elapsed = clock.now_ns();
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod calc;
mod clock;
pub mod config;
mod delay;
mod error;
pub mod fallback;
pub mod monotonic;
pub mod registry;
pub mod source;
pub mod units;

pub use calc::{Scale, compute_mult_shift, hz_to_mult};
pub use clock::{Clock, YieldFn};
pub use config::{BootStage, ClockConfig};
pub use error::ClockError;
pub use fallback::FallbackCounter;
pub use registry::{ClockRegistry, Outcome, Registration};
pub use source::{ClockSource, Counter};
