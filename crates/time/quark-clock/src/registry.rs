//! Clock source selection.
//!
//! Exactly one source is active at a time. A newly registered source takes
//! over only if its priority is strictly higher than the active one's; the
//! states are `Uninitialized -> Active(low) -> Active(high)` and there is no
//! way back.
//!
//! [`ClockRegistry`] is plain data with no locking of its own. The
//! [`Clock`](crate::Clock) context wraps it together with the accumulator
//! under one lock and drives registration in phases ([`admit`],
//! [`reject`], [`install`]) so a source's bring-up can run unlocked.
//!
//! [`admit`]: ClockRegistry::admit
//! [`reject`]: ClockRegistry::reject
//! [`install`]: ClockRegistry::install

use planck_noalloc::vec::ArrayVec;

use crate::error::ClockError;
use crate::source::ClockSource;

/// Number of registration attempts kept for diagnostics.
pub const HISTORY_CAPACITY: usize = 16;

/// What happened to a registered source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The source became the active source.
    Activated,
    /// The source did not outrank the active source and was dropped.
    Ignored,
    /// The source's bring-up failed and it was dropped.
    InitFailed,
}

/// One entry of the registration history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Source name.
    pub name: &'static str,
    /// Source priority.
    pub priority: i32,
    /// What the registry did with it.
    pub outcome: Outcome,
}

/// The active clock source plus registration bookkeeping.
pub struct ClockRegistry {
    active: Option<ClockSource>,
    history: ArrayVec<Registration, HISTORY_CAPACITY>,
    fallback_warned: bool,
}

impl ClockRegistry {
    /// Creates an empty registry with no active source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: None,
            history: ArrayVec::new(),
            fallback_warned: false,
        }
    }

    /// Returns the active source, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ClockSource> {
        self.active.as_ref()
    }

    /// Returns the active source mutably, if any.
    pub fn active_mut(&mut self) -> Option<&mut ClockSource> {
        self.active.as_mut()
    }

    /// Returns `true` if a source with `priority` would replace the active
    /// source (or there is none).
    #[must_use]
    pub fn outranks_active(&self, priority: i32) -> bool {
        self.active
            .as_ref()
            .is_none_or(|active| priority > active.priority())
    }

    /// Registration attempts so far, oldest first.
    ///
    /// Holds at most [`HISTORY_CAPACITY`] entries; later attempts are not
    /// recorded.
    #[must_use]
    pub fn history(&self) -> &[Registration] {
        self.history.as_slice()
    }

    /// Registers `source`, running its bring-up in place.
    ///
    /// Suitable when the registry is not shared; [`Clock::register`]
    /// performs the same steps with the bring-up outside its lock.
    ///
    /// # Errors
    ///
    /// [`ClockError::InitFailed`] if the source outranked the active one but
    /// its bring-up failed. The active source is unchanged.
    ///
    /// [`Clock::register`]: crate::Clock::register
    pub fn register(&mut self, mut source: ClockSource) -> Result<(), ClockError> {
        if !self.admit(&source) {
            return Ok(());
        }
        if let Err(err) = source.init() {
            self.reject(&source, err);
            return Err(ClockError::InitFailed);
        }
        self.install(source);
        Ok(())
    }

    /// First registration phase: decides whether `source` is worth bringing up.
    ///
    /// Records and logs the attempt as ignored when it is not.
    pub fn admit(&mut self, source: &ClockSource) -> bool {
        if self.outranks_active(source.priority()) {
            return true;
        }
        log::debug!(
            "clock: ignoring {} (priority {}), {} stays active",
            source.name(),
            source.priority(),
            self.active.as_ref().map_or("<none>", ClockSource::name),
        );
        self.record(source, Outcome::Ignored);
        false
    }

    /// Records that `source` failed its bring-up with `err`.
    pub fn reject(&mut self, source: &ClockSource, err: ClockError) {
        log::error!(
            "clock: {} (priority {}) failed to initialize: {err}",
            source.name(),
            source.priority(),
        );
        self.record(source, Outcome::InitFailed);
    }

    /// Final registration phase: baselines `source` at its current counter
    /// value and makes it the active source.
    ///
    /// The counter may have been running since power-on; only cycles from
    /// this point on count towards elapsed time. The replaced source, if any,
    /// is dropped.
    pub fn install(&mut self, mut source: ClockSource) {
        source.rebase();
        log::info!(
            "clock: switching to {} (priority {}, mult {}, shift {})",
            source.name(),
            source.priority(),
            source.scale().mult,
            source.scale().shift,
        );
        self.record(&source, Outcome::Activated);
        self.active = Some(source);
    }

    /// Returns `true` exactly once, the first time it is called while the
    /// active source is a fallback source.
    pub(crate) fn take_fallback_warning(&mut self) -> bool {
        let on_fallback = self.active.as_ref().is_some_and(ClockSource::is_fallback);
        if on_fallback && !self.fallback_warned {
            self.fallback_warned = true;
            return true;
        }
        false
    }

    fn record(&mut self, source: &ClockSource, outcome: Outcome) {
        // Attempts past capacity are dropped.
        let _ = self.history.try_push(Registration {
            name: source.name(),
            priority: source.priority(),
            outcome,
        });
    }
}

impl Default for ClockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ClockRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClockRegistry")
            .field("active", &self.active)
            .field("history", &self.history())
            .field("fallback_warned", &self.fallback_warned)
            .finish()
    }
}
