//! Spin-based mutual exclusion lock.
//!
//! Uses test-and-test-and-set (TTAS) to reduce cache-line contention.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use super::loom_compat::{AtomicBool, Ordering, spin_loop};

/// A spin-based mutual exclusion lock.
///
/// Const-constructable so it can be placed in `static` items by board code
/// that wants a single process-wide clock. On a single hart with no
/// interrupt-context callers it never actually spins; it exists so that a
/// target which does introduce such callers keeps every read-modify-write of
/// the guarded state indivisible.
pub struct SpinLock<T> {
    locked: AtomicBool,
    name: &'static str,
    data: UnsafeCell<T>,
}

// SAFETY: The SpinLock ensures exclusive access to `T` via atomic operations.
// `T: Send` is required because the data may be accessed from different threads.
unsafe impl<T: Send> Send for SpinLock<T> {}
unsafe impl<T: Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates a new unlocked `SpinLock` wrapping `value`.
    #[cfg(not(loom))]
    pub const fn new(value: T) -> Self {
        Self::named("<unnamed>", value)
    }

    /// Creates a new unlocked `SpinLock` with a name for diagnostics.
    #[cfg(not(loom))]
    pub const fn named(name: &'static str, value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            name,
            data: UnsafeCell::new(value),
        }
    }

    /// Creates a new unlocked `SpinLock` wrapping `value`.
    #[cfg(loom)]
    pub fn new(value: T) -> Self {
        Self::named("<unnamed>", value)
    }

    /// Creates a new unlocked `SpinLock` with a name for diagnostics.
    #[cfg(loom)]
    pub fn named(name: &'static str, value: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            name,
            data: UnsafeCell::new(value),
        }
    }

    /// Returns the diagnostic name given at construction.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Acquires the lock, spinning until it becomes available.
    ///
    /// Returns a [`SpinLockGuard`] that releases the lock when dropped.
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        loop {
            // Fast path: try to acquire directly.
            if self
                .locked
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_ok()
            {
                return SpinLockGuard { lock: self };
            }

            // TTAS: spin on a read (shared cache line) until it looks free.
            while self.locked.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    /// Attempts to acquire the lock without blocking.
    ///
    /// Returns `Some(guard)` if the lock was acquired, `None` if it was already held.
    /// Useful in panic handlers where blocking would risk deadlock.
    pub fn try_lock(&self) -> Option<SpinLockGuard<'_, T>> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(SpinLockGuard { lock: self })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the data through an exclusive borrow.
    ///
    /// No locking is needed: `&mut self` proves there are no other users.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

/// RAII guard that releases the [`SpinLock`] when dropped.
pub struct SpinLockGuard<'a, T> {
    lock: &'a SpinLock<T>,
}

impl<T> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: The guard guarantees exclusive access while it exists.
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: The guard guarantees exclusive access while it exists.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
