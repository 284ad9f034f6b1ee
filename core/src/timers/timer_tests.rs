//! Tests for the timer state machine
//!
//! Verifies the shared update contract and each kind's reset policy by
//! driving timers scan by scan from a manual clock.

use multitimer_types::TimerKind;

use super::Timer;
use crate::clock::{ManualClock, Tick, TimeSource};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Advance the clock by `step` and run one scan
fn scan(timer: &mut Timer, clock: &ManualClock, step: Tick) -> bool {
    timer.update(clock.advance(step))
}

/// Run `n` unit-step scans, returning the scan numbers (1-based) where done was true
fn done_scans(timer: &mut Timer, clock: &ManualClock, n: u32) -> Vec<u32> {
    (1..=n).filter(|_| scan(timer, clock, 1)).collect()
}

/// Deterministic LCG so sweeps are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.0 >> 33
    }

    fn flip(&mut self, one_in: u64) -> bool {
        self.next() % one_in == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Shared Contract
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_on_delay_done_exactly_at_preset() {
    let clock = ManualClock::new();
    let mut timer = Timer::on_delay(5);
    timer.set_enable(true);

    for i in 1..=10 {
        let done = scan(&mut timer, &clock, 1);
        assert_eq!(done, i >= 5, "scan {i}");
        assert_eq!(timer.is_done(), done);
        assert_eq!(timer.done_rose(), i == 5, "scan {i}");
        assert!(!timer.done_fell());
        assert_eq!(timer.is_running(), i < 5, "scan {i}");
        assert_eq!(timer.count(), i.min(5));
    }
}

#[test]
fn test_on_delay_clears_when_disabled() {
    let clock = ManualClock::new();
    let mut timer = Timer::on_delay(3);
    timer.set_enable(true);
    done_scans(&mut timer, &clock, 4);
    assert!(timer.is_done());

    timer.set_enable(false);
    assert!(!scan(&mut timer, &clock, 1));
    assert_eq!(timer.count(), 0);
    assert!(timer.done_fell());
    assert!(!timer.is_running());

    scan(&mut timer, &clock, 1);
    assert!(!timer.done_fell(), "fell pulse lasts one scan");
}

#[test]
fn test_reset_input_holds_timer_clear() {
    let clock = ManualClock::new();
    let mut timer = Timer::on_delay(3);
    timer.set_enable(true);
    timer.set_reset(true);

    for _ in 0..10 {
        assert!(!scan(&mut timer, &clock, 1));
        assert_eq!(timer.count(), 0);
        assert!(!timer.is_running(), "reset suppresses running");
    }
    assert!(timer.is_reset());
}

#[test]
fn test_zero_preset_done_on_first_accumulating_scan() {
    let clock = ManualClock::new();
    let mut timer = Timer::on_delay(0);
    assert!(!scan(&mut timer, &clock, 0), "not accumulating while disabled");

    timer.set_enable(true);
    assert!(scan(&mut timer, &clock, 0));
    assert!(timer.done_rose());
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_accumulator_saturates_on_large_delta() {
    let clock = ManualClock::new();
    let mut timer = Timer::on_delay(100);
    timer.set_enable(true);

    assert!(scan(&mut timer, &clock, 1_000_000));
    assert_eq!(timer.count(), 100);
    assert!(scan(&mut timer, &clock, Tick::MAX / 2));
    assert_eq!(timer.count(), 100);
}

#[test]
fn test_delta_correct_across_clock_wraparound() {
    let clock = ManualClock::starting_at(Tick::MAX - 2);
    let mut timer = Timer::on_delay(5);
    timer.sync_clock(clock.now());
    timer.set_enable(true);

    for i in 1..=4 {
        assert!(!scan(&mut timer, &clock, 1), "scan {i}");
    }
    assert_eq!(timer.count(), 4);
    assert!(scan(&mut timer, &clock, 1));
    assert!(clock.now() < 5, "clock wrapped");
}

#[test]
fn test_edges_never_both_and_running_respects_reset() {
    let mut rng = Lcg(7);

    for kind in TimerKind::ALL {
        let clock = ManualClock::new();
        let mut timer = Timer::with_on_time(kind, 7, 3);

        for _ in 0..500 {
            if rng.flip(6) {
                timer.set_enable(!timer.is_enabled());
            }
            if rng.flip(9) {
                timer.set_reset(!timer.is_reset());
            }
            if rng.flip(5) {
                timer.set_control(rng.flip(2));
            }
            if rng.flip(40) {
                timer.start(true);
            }
            let step = (rng.next() % 4) as Tick;
            scan(&mut timer, &clock, step);

            assert!(timer.count() <= timer.preset(), "{kind}: accumulator above preset");
            assert!(!(timer.done_rose() && timer.done_fell()), "{kind}: both edges");
            assert!(!(timer.is_running() && timer.is_reset()), "{kind}: running while reset");
        }
    }
}

#[test]
fn test_standalone_snapshot() {
    let clock = ManualClock::new();
    let mut timer = Timer::retentive(4);
    timer.set_enable(true);
    scan(&mut timer, &clock, 2);

    let snap = timer.snapshot();
    assert_eq!(snap.kind, TimerKind::Retentive);
    assert_eq!(snap.count, 2);
    assert!(snap.running);
    assert!(snap.on_time.is_none());
    assert!(!snap.flashing);
}

// ═══════════════════════════════════════════════════════════════════════════
// Retentive
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_retentive_keeps_count_across_enable_toggles() {
    let clock = ManualClock::new();
    let mut timer = Timer::retentive(10);
    timer.set_enable(true);
    done_scans(&mut timer, &clock, 4);
    assert_eq!(timer.count(), 4);

    timer.set_enable(false);
    done_scans(&mut timer, &clock, 3);
    assert_eq!(timer.count(), 4);
    assert!(!timer.is_running());

    timer.set_enable(true);
    assert_eq!(done_scans(&mut timer, &clock, 6), vec![6]);
    assert_eq!(timer.count(), 10);

    timer.set_reset(true);
    assert!(!scan(&mut timer, &clock, 1));
    assert!(timer.done_fell());
    assert_eq!(timer.count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Pulse Generator
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_pulse_generator_produces_periodic_single_scan_pulses() {
    let clock = ManualClock::new();
    let mut timer = Timer::pulse_generator(4);
    timer.set_enable(true);

    let mut done_at = Vec::new();
    let mut previous_done = false;
    for i in 1..=40 {
        let done = scan(&mut timer, &clock, 1);
        if done {
            done_at.push(i);
            assert!(timer.done_rose(), "scan {i}");
            assert!(!previous_done, "done lasted more than one scan at {i}");
        }
        assert_eq!(timer.done_fell(), previous_done, "scan {i}");
        previous_done = done;
    }

    // One done scan, one clearing scan, then `preset` accumulating scans.
    assert_eq!(done_at, vec![4, 9, 14, 19, 24, 29, 34, 39]);
}

#[test]
fn test_pulse_generator_stops_on_reset() {
    let clock = ManualClock::new();
    let mut timer = Timer::pulse_generator(2);
    timer.set_enable(true);
    timer.set_reset(true);
    assert!(done_scans(&mut timer, &clock, 20).is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Latched
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_latched_runs_to_preset_without_enable() {
    let clock = ManualClock::new();
    let mut timer = Timer::latched(5);

    timer.start(false);
    assert!(!timer.is_control(), "start(false) does nothing");
    assert!(done_scans(&mut timer, &clock, 3).is_empty());
    assert_eq!(timer.count(), 0);

    timer.start(true);
    timer.set_enable(false);
    for i in 1..=4 {
        assert!(!scan(&mut timer, &clock, 1));
        assert!(timer.is_running(), "scan {i}");
    }
    assert!(scan(&mut timer, &clock, 1));
    assert!(timer.done_rose());

    // Stays done until reset.
    assert_eq!(done_scans(&mut timer, &clock, 5).len(), 5);

    timer.set_reset(true);
    assert!(!scan(&mut timer, &clock, 1));
    assert!(timer.done_fell());
    assert_eq!(timer.count(), 0);
    assert!(!timer.is_control(), "clearing drops the latch");

    timer.set_reset(false);
    assert!(done_scans(&mut timer, &clock, 10).is_empty());
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_latched_reset_before_done_does_not_clear() {
    let clock = ManualClock::new();
    let mut timer = Timer::latched(10);
    timer.start(true);
    done_scans(&mut timer, &clock, 3);

    timer.set_reset(true);
    scan(&mut timer, &clock, 1);
    assert_eq!(timer.count(), 4, "still accumulating while not done");
    assert!(!timer.is_running(), "but not reported as running");
}

#[test]
fn test_start_ignored_by_other_kinds() {
    let mut timer = Timer::on_delay(5);
    timer.start(true);
    assert!(!timer.is_control());
}

// ═══════════════════════════════════════════════════════════════════════════
// Retriggerable
// ═══════════════════════════════════════════════════════════════════════════

/// Scan with the caller re-applying the control level, as a driver reading
/// an input every scan would.
fn scan_with_control(timer: &mut Timer, clock: &ManualClock, control: bool) -> bool {
    timer.set_control(control);
    scan(timer, clock, 1)
}

#[test]
fn test_retriggerable_restarts_on_control_change() {
    let clock = ManualClock::new();
    let mut timer = Timer::retriggerable(5);
    timer.set_enable(true);

    for _ in 0..3 {
        scan_with_control(&mut timer, &clock, false);
    }
    assert_eq!(timer.count(), 3);

    assert!(!scan_with_control(&mut timer, &clock, true));
    assert_eq!(timer.count(), 0, "rising control restarts the cycle");

    let mut first_done = None;
    for i in 5..=12 {
        if scan_with_control(&mut timer, &clock, true) && first_done.is_none() {
            first_done = Some(i);
        }
    }
    assert_eq!(first_done, Some(9));

    assert!(!scan_with_control(&mut timer, &clock, false));
    assert!(timer.done_fell(), "falling control restarts too");
}

#[test]
fn test_retriggerable_fast_toggling_keeps_done_low() {
    let clock = ManualClock::new();
    let mut timer = Timer::retriggerable(5);
    timer.set_enable(true);

    for i in 0..60u32 {
        let level = (i / 2) % 2 == 1;
        assert!(!scan_with_control(&mut timer, &clock, level), "scan {i}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Flasher
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_flasher_output_follows_on_time() {
    let clock = ManualClock::new();
    let mut timer = Timer::flasher(10, 3);
    timer.set_enable(true);

    for i in 1..=35 {
        scan(&mut timer, &clock, 1);
        assert_eq!(
            timer.is_flashing(),
            timer.count() <= 3,
            "scan {i}, count {}",
            timer.count()
        );
    }

    timer.set_enable(false);
    scan(&mut timer, &clock, 1);
    assert!(!timer.is_flashing());
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_flasher_cycles_like_pulse_generator() {
    let clock = ManualClock::new();
    let mut timer = Timer::flasher(3, 1);
    timer.set_enable(true);
    assert_eq!(done_scans(&mut timer, &clock, 16), vec![3, 7, 11, 15]);
}

#[test]
fn test_flasher_zero_on_time_never_flashes() {
    let clock = ManualClock::new();
    let mut timer = Timer::flasher(5, 0);
    timer.set_enable(true);
    assert!(!timer.is_flashing());
    for _ in 0..20 {
        scan(&mut timer, &clock, 1);
        assert!(!timer.is_flashing());
    }
}

#[test]
fn test_set_on_time_forces_cycle_end() {
    let clock = ManualClock::new();
    let mut timer = Timer::flasher(10, 3);
    timer.set_enable(true);
    done_scans(&mut timer, &clock, 4);
    assert_eq!(timer.count(), 4);

    timer.set_on_time(6);
    assert_eq!(timer.on_time(), Some(6));
    assert_eq!(timer.count(), 10);

    assert!(scan(&mut timer, &clock, 1), "done on the next scan");
    assert!(timer.done_rose());

    assert!(!scan(&mut timer, &clock, 1), "cleared on the scan after");
    assert!(timer.done_fell());
    assert_eq!(timer.count(), 0);
    assert!(timer.is_flashing());
}

#[test]
fn test_set_on_time_ignored_by_other_kinds() {
    let mut timer = Timer::pulse_generator(10);
    timer.set_on_time(5);
    assert_eq!(timer.on_time(), None);
    assert_eq!(timer.count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Off-Delay
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_off_delay_rests_done() {
    let timer = Timer::off_delay(5);
    assert!(timer.is_done());
    assert!(!timer.is_running());
}

#[test]
fn test_off_delay_drops_done_preset_ticks_after_enable_falls() {
    let clock = ManualClock::new();
    let mut timer = Timer::off_delay(5);
    timer.set_enable(true);

    for _ in 0..3 {
        assert!(scan(&mut timer, &clock, 1));
        assert_eq!(timer.count(), 0);
        assert!(!timer.is_running());
        assert!(!timer.done_rose() && !timer.done_fell());
    }
    let enable_fell_at = clock.now();

    timer.set_enable(false);
    for i in 1..=4 {
        assert!(scan(&mut timer, &clock, 1), "still done {i} ticks after");
        assert!(timer.is_running());
    }

    assert!(!scan(&mut timer, &clock, 1));
    assert_eq!(clock.now() - enable_fell_at, 5);
    assert!(timer.done_fell());
    assert!(!timer.is_running());
    assert_eq!(timer.count(), 5);

    assert!(!scan(&mut timer, &clock, 1));
    assert!(!timer.done_fell(), "one pulse only");

    timer.set_enable(true);
    assert!(scan(&mut timer, &clock, 1));
    assert!(timer.done_rose());
    assert_eq!(timer.count(), 0);
}

#[test]
fn test_off_delay_reset_forces_done() {
    let clock = ManualClock::new();
    let mut timer = Timer::off_delay(3);
    done_scans(&mut timer, &clock, 5);
    assert!(!timer.is_done());

    timer.set_reset(true);
    assert!(scan(&mut timer, &clock, 1));
    assert!(timer.done_rose());
    assert_eq!(timer.count(), 0);
    assert!(!timer.is_running());
}
