//! The clock context.
//!
//! [`Clock`] owns the registry and the nanosecond accumulator behind one
//! [`SpinLock`], so source switches and time queries are each a single
//! indivisible step even if a target calls in from interrupt context.
//! Start-up code creates it once and hands out references.

use core::sync::atomic::{AtomicPtr, Ordering};

use quark_core::sync::SpinLock;

use crate::config::{BootStage, ClockConfig};
use crate::error::ClockError;
use crate::monotonic::Monotonic;
use crate::registry::{ClockRegistry, Registration};
use crate::source::ClockSource;

/// Signature of the cooperative scheduler hook.
pub type YieldFn = fn();

fn no_yield() {}

struct ClockState {
    registry: ClockRegistry,
    time: Monotonic,
}

/// Monotonic nanosecond clock over the highest-priority registered source.
pub struct Clock {
    state: SpinLock<ClockState>,
    config: ClockConfig,
    yield_fn: AtomicPtr<()>,
}

impl Clock {
    /// Creates a clock.
    ///
    /// In [`BootStage::Proper`] the fallback source is installed right away,
    /// so [`now_ns`](Self::now_ns) always has something to read. In
    /// [`BootStage::Pbl`] the clock starts with no source.
    #[must_use]
    pub fn new(config: ClockConfig) -> Self {
        let mut registry = ClockRegistry::new();
        if config.stage == BootStage::Proper {
            registry.install(ClockSource::fallback(config.fallback_rate));
        }
        Self {
            state: SpinLock::named("clock", ClockState {
                registry,
                time: Monotonic::new(),
            }),
            config,
            yield_fn: AtomicPtr::new(no_yield as *mut ()),
        }
    }

    /// Returns the configuration the clock was built with.
    #[must_use]
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Offers `source` to the clock.
    ///
    /// If nothing is active yet, or `source` has a strictly higher priority
    /// than the active source, its bring-up runs once and it becomes the
    /// active source, baselined at its current counter value. Otherwise it
    /// is dropped and this returns `Ok`.
    ///
    /// The bring-up runs without the clock's lock held, so a driver may use
    /// this clock (for example to wait for its own counter to settle) while
    /// initializing.
    ///
    /// # Errors
    ///
    /// [`ClockError::InitFailed`] if the bring-up failed. The previously
    /// active source keeps running and accumulated time is untouched.
    pub fn register(&self, mut source: ClockSource) -> Result<(), ClockError> {
        if !self.state.lock().registry.admit(&source) {
            return Ok(());
        }

        if let Err(err) = source.init() {
            self.state.lock().registry.reject(&source, err);
            return Err(ClockError::InitFailed);
        }

        let mut state = self.state.lock();
        // Something better may have been installed during the bring-up.
        if state.registry.admit(&source) {
            state.registry.install(source);
        }
        Ok(())
    }

    /// Returns nanoseconds elapsed since the clock was created.
    ///
    /// Non-decreasing across calls as long as the active counter is sampled
    /// at least once per wrap period.
    ///
    /// # Panics
    ///
    /// If no source has been registered. That can only happen in
    /// [`BootStage::Pbl`], where there is nothing sensible to fall back to.
    #[must_use]
    pub fn now_ns(&self) -> u64 {
        self.try_now_ns()
            .unwrap_or_else(|_| panic!("no PBL clock source has been initialized"))
    }

    /// Like [`now_ns`](Self::now_ns), but reports a missing source instead
    /// of panicking.
    ///
    /// # Errors
    ///
    /// [`ClockError::NoClockSource`] if no source has been registered.
    pub fn try_now_ns(&self) -> Result<u64, ClockError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let source = state
            .registry
            .active_mut()
            .ok_or(ClockError::NoClockSource)?;
        Ok(state.time.advance(source))
    }

    /// The late-initialization checkpoint for the fallback source.
    ///
    /// If no hardware source has been registered by now, logs a warning the
    /// first time this is called. Returns `true` if the warning was emitted.
    /// Time keeps working on the fallback either way.
    pub fn warn_if_fallback(&self) -> bool {
        let warn = self.state.lock().registry.take_fallback_warning();
        if warn {
            log::warn!("clock: using dummy clock source, delays are not calibrated");
        }
        warn
    }

    /// Returns the name of the active source.
    #[must_use]
    pub fn active_name(&self) -> Option<&'static str> {
        self.state.lock().registry.active().map(ClockSource::name)
    }

    /// Returns the priority of the active source.
    #[must_use]
    pub fn active_priority(&self) -> Option<i32> {
        self.state.lock().registry.active().map(ClockSource::priority)
    }

    /// Returns `true` while the active source is the software fallback.
    #[must_use]
    pub fn is_fallback_active(&self) -> bool {
        self.state
            .lock()
            .registry
            .active()
            .is_some_and(ClockSource::is_fallback)
    }

    /// Calls `f` with the registration history, oldest first.
    pub fn with_history<R>(&self, f: impl FnOnce(&[Registration]) -> R) -> R {
        f(self.state.lock().registry.history())
    }

    /// Registers the cooperative scheduler hook called during long delays.
    ///
    /// The hook runs inline on the delaying thread, never with the clock's
    /// lock held, and must return promptly.
    pub fn set_yield_hook(&self, f: YieldFn) {
        self.yield_fn.store(f as *mut (), Ordering::Release);
    }

    /// Calls the registered scheduler hook.
    pub(crate) fn yield_now(&self) {
        let ptr = self.yield_fn.load(Ordering::Acquire);
        // SAFETY: We only ever store valid `YieldFn` function pointers into yield_fn.
        let f = unsafe { core::mem::transmute::<*mut (), YieldFn>(ptr) };
        f();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(ClockConfig::new())
    }
}

impl core::fmt::Debug for Clock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock")
            .field("config", &self.config)
            .field("active", &self.active_name())
            .finish_non_exhaustive()
    }
}
