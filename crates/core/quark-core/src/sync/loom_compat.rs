//! Loom compatibility shim.
//!
//! When compiled with `cfg(loom)`, re-exports loom's atomic types and spin
//! hint so the lock's acquire/release protocol runs under loom's
//! deterministic scheduler. Otherwise, re-exports the `core` equivalents.

#[cfg(loom)]
pub(crate) use loom::hint::spin_loop;
#[cfg(loom)]
pub(crate) use loom::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(loom))]
pub(crate) use core::hint::spin_loop;
#[cfg(not(loom))]
pub(crate) use core::sync::atomic::{AtomicBool, Ordering};
