//! Synchronization primitives for firmware.
//!
//! Provides [`SpinLock`], suitable for use in `static` items and usable
//! before any allocator or scheduler is available.

mod spinlock;

pub(crate) mod loom_compat;

pub use spinlock::{SpinLock, SpinLockGuard};
