//! End-to-end behaviour of the clock through its public API, driven by
//! counters whose values the tests control.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use quark_clock::units::{MSECOND, SECOND, counter_mask};
use quark_clock::{Clock, ClockConfig, ClockError, ClockSource, Counter, Outcome, Scale};

/// A counter register the test writes directly, as if the hardware ticked.
#[derive(Clone, Default)]
struct Register(Arc<AtomicU64>);

impl Register {
    fn set(&self, value: u64) {
        self.0.store(value, Ordering::Relaxed);
    }
}

impl Counter for Register {
    fn read(&mut self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

fn hw(name: &'static str, priority: i32, reg: &Register) -> ClockSource {
    ClockSource::new(
        name,
        Box::new(reg.clone()),
        u64::MAX,
        Scale::IDENTITY,
        priority,
    )
}

#[test]
fn priority_arbitration() {
    let clock = Clock::default();

    let ten = Register::default();
    ten.set(1_000);
    clock.register(hw("ten", 10, &ten)).unwrap();
    assert_eq!(clock.active_priority(), Some(10));

    let five = Register::default();
    clock.register(hw("five", 5, &five)).unwrap();
    assert_eq!(clock.active_name(), Some("ten"));

    ten.set(1_500);
    let before_switch = clock.now_ns();
    assert_eq!(before_switch, 500);

    let fifteen = Register::default();
    fifteen.set(9_999_000);
    clock.register(hw("fifteen", 15, &fifteen)).unwrap();
    assert_eq!(clock.active_name(), Some("fifteen"));

    // Neither the old source's ticks nor the new one's pre-switch count leak in.
    ten.set(50_000);
    assert_eq!(clock.now_ns(), before_switch);
    fifteen.set(9_999_250);
    assert_eq!(clock.now_ns(), before_switch + 250);

    let outcomes: Vec<_> =
        clock.with_history(|h| h.iter().map(|r| (r.name, r.outcome)).collect());
    assert_eq!(
        outcomes,
        [
            ("dummy", Outcome::Activated),
            ("ten", Outcome::Activated),
            ("five", Outcome::Ignored),
            ("fifteen", Outcome::Activated),
        ]
    );
}

#[test]
fn narrow_counter_stays_monotonic_across_wraps() {
    // A 32-bit counter at 1 MHz wraps roughly every 71 minutes.
    let reg = Register::default();
    reg.set(0xFFFF_0000);
    let cs =
        ClockSource::with_frequency("gpt", Box::new(reg.clone()), 32, 1_000_000, 100).unwrap();
    let clock = Clock::new(ClockConfig::pbl());
    clock.register(cs).unwrap();

    let mut raw: u64 = 0xFFFF_0000;
    let mut last = 0;
    // Step 30 minutes at a time through several wraps.
    for _ in 0..10 {
        raw = (raw + 1_800_000_000) & counter_mask(32);
        reg.set(raw);
        let now = clock.now_ns();
        assert!(now >= last);
        last = now;
    }
    assert_eq!(last, 10 * 1_800 * SECOND);
}

#[test]
fn fallback_alone_is_strictly_increasing() {
    let clock = Clock::new(ClockConfig::new().with_fallback_rate(37));
    let samples: Vec<u64> = (0..100).map(|_| clock.now_ns()).collect();
    for pair in samples.windows(2) {
        assert_eq!(pair[1] - pair[0], 37);
    }
    assert_eq!(samples[0], 37);
}

#[test]
fn delay_on_fallback_accumulates_the_full_duration() {
    let clock = Clock::default();
    let wall = Instant::now();
    let start = clock.now_ns();

    clock.delay_ms(10);

    assert!(clock.now_ns() - start >= 10 * MSECOND);
    // Fallback time is driven by reads, not the wall clock: ten thousand
    // reads finish far sooner than any real-time bound a test should need.
    assert!(wall.elapsed() < Duration::from_secs(10));
}

#[test]
fn failed_bring_up_is_recoverable() {
    struct Dead;

    impl Counter for Dead {
        fn read(&mut self) -> u64 {
            unreachable!("a source that failed init is never read")
        }

        fn init(&mut self, _scale: &mut Scale) -> Result<(), ClockError> {
            Err(ClockError::Timeout)
        }
    }

    let clock = Clock::default();
    let t0 = clock.now_ns();
    let dead = ClockSource::new("dead", Box::new(Dead), u64::MAX, Scale::IDENTITY, 50);
    assert_eq!(clock.register(dead), Err(ClockError::InitFailed));
    assert!(clock.is_fallback_active());
    assert!(clock.now_ns() > t0);

    // The caller may go on to register something else.
    let reg = Register::default();
    clock.register(hw("spare", 40, &reg)).unwrap();
    assert_eq!(clock.active_name(), Some("spare"));
}

#[test]
fn wait_on_timeout_sees_hardware_become_ready() {
    let clock = Clock::default();
    let status = Register::default();
    let mut polls = 0u64;
    let result = clock.wait_on_timeout(MSECOND, || {
        polls += 1;
        if polls == 10 {
            status.set(1);
        }
        status.0.load(Ordering::Relaxed) == 1
    });
    assert_eq!(result, Ok(()));
}
