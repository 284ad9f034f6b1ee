//! Scan-cycle timer instance
//!
//! A `Timer` is advanced once per scan by `update(now)`. Each call:
//!
//! 1. takes the tick delta since the previous call,
//! 2. accumulates it while the run condition holds, saturating at preset,
//! 3. asks the kind's reset policy whether to clear,
//! 4. regenerates the one-scan done edges,
//! 5. derives the running flag,
//!
//! and returns `done`. Off-delay runs the same five steps with the run
//! condition and done polarity inverted.
//!
//! The caller owns the inputs (`enable`, `reset`, `control`); the timer only
//! ever writes `control` back to false when it clears.

use multitimer_types::TimerKind;
use serde::Serialize;
use tracing::trace;

use super::behavior::{Behavior, Inputs, Outputs};
use super::edge::OneShot;
use crate::clock::{Tick, elapsed};

/// A single timer. Works standalone (call `update` yourself) or as a
/// member of a `TimerRegistry`.
#[derive(Debug, Clone)]
pub struct Timer {
    behavior: Behavior,

    // ─── Timing ─────────────────────────────────────────────────────────────
    /// Target duration in ticks
    preset: Tick,

    /// Elapsed ticks since the last clear, never above `preset`
    accumulator: Tick,

    /// Clock value seen by the previous `update`
    last_tick: Tick,

    // ─── Inputs ─────────────────────────────────────────────────────────────
    enable: bool,
    reset: bool,
    control: bool,

    // ─── Outputs ────────────────────────────────────────────────────────────
    done: bool,
    running: bool,
    done_edge: OneShot,
}

impl Timer {
    /// Create a timer of the given kind. A flasher built this way has no
    /// on-time until `set_on_time` is called.
    pub fn new(kind: TimerKind, preset: Tick) -> Self {
        Self::with_on_time(kind, preset, 0)
    }

    /// Create a timer of the given kind with an on-time. The on-time is only
    /// kept by flashers.
    pub fn with_on_time(kind: TimerKind, preset: Tick, on_time: Tick) -> Self {
        let behavior = Behavior::new(kind, on_time);
        // Off-delay rests in the done state; everything else rests not done.
        let done = matches!(behavior, Behavior::OffDelay);

        Self {
            behavior,
            preset,
            accumulator: 0,
            last_tick: 0,
            enable: false,
            reset: false,
            control: false,
            done,
            running: false,
            done_edge: OneShot::armed_for(done),
        }
    }

    pub fn on_delay(preset: Tick) -> Self {
        Self::new(TimerKind::OnDelay, preset)
    }

    pub fn off_delay(preset: Tick) -> Self {
        Self::new(TimerKind::OffDelay, preset)
    }

    pub fn retentive(preset: Tick) -> Self {
        Self::new(TimerKind::Retentive, preset)
    }

    pub fn pulse_generator(preset: Tick) -> Self {
        Self::new(TimerKind::PulseGenerator, preset)
    }

    pub fn latched(preset: Tick) -> Self {
        Self::new(TimerKind::Latched, preset)
    }

    pub fn retriggerable(preset: Tick) -> Self {
        Self::new(TimerKind::Retriggerable, preset)
    }

    /// Flasher whose flash output is on for the first `on_time` ticks of
    /// every `preset`-tick cycle.
    pub fn flasher(preset: Tick, on_time: Tick) -> Self {
        Self::with_on_time(TimerKind::Flasher, preset, on_time)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Inputs
    // ═══════════════════════════════════════════════════════════════════════

    pub fn set_enable(&mut self, enable: bool) {
        self.enable = enable;
    }

    pub fn set_reset(&mut self, reset: bool) {
        self.reset = reset;
    }

    pub fn set_control(&mut self, control: bool) {
        self.control = control;
    }

    /// Start a latched timer. Only a `true` pulse does anything; once started
    /// the timer runs to preset regardless of `enable`. No-op on other kinds.
    pub fn start(&mut self, start: bool) {
        if start && matches!(self.behavior, Behavior::Latched) {
            self.control = true;
        }
    }

    /// Change a flasher's on-time. Forces the accumulator to preset so the
    /// running cycle ends on the next scan and the new on-time applies from
    /// the cycle after. No-op on other kinds.
    pub fn set_on_time(&mut self, on_time: Tick) {
        if let Behavior::Flasher { on_time: current } = &mut self.behavior {
            *current = on_time;
            self.accumulator = self.preset;
        }
    }

    /// Re-baseline the clock without accumulating, e.g. when a timer is
    /// created long after the clock started.
    pub fn sync_clock(&mut self, now: Tick) {
        self.last_tick = now;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    pub fn kind(&self) -> TimerKind {
        self.behavior.kind()
    }

    pub fn preset(&self) -> Tick {
        self.preset
    }

    /// Accumulated ticks
    pub fn count(&self) -> Tick {
        self.accumulator
    }

    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    pub fn is_reset(&self) -> bool {
        self.reset
    }

    pub fn is_control(&self) -> bool {
        self.control
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// True while accumulating toward an unfinished, unreset preset
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True for the one scan on which `done` went true
    pub fn done_rose(&self) -> bool {
        self.done_edge.rose()
    }

    /// True for the one scan on which `done` went false
    pub fn done_fell(&self) -> bool {
        self.done_edge.fell()
    }

    /// Flasher on-time, `None` for other kinds
    pub fn on_time(&self) -> Option<Tick> {
        match self.behavior {
            Behavior::Flasher { on_time } => Some(on_time),
            _ => None,
        }
    }

    /// Flasher auxiliary output: on while enabled and within the first
    /// `on_time` ticks of the cycle. An on-time of zero disables it.
    pub fn is_flashing(&self) -> bool {
        match self.behavior {
            Behavior::Flasher { on_time } => {
                self.enable && on_time > 0 && self.accumulator <= on_time
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            kind: self.kind(),
            preset: self.preset,
            count: self.accumulator,
            on_time: self.on_time(),
            enable: self.enable,
            reset: self.reset,
            control: self.control,
            done: self.done,
            running: self.running,
            done_rose: self.done_rose(),
            done_fell: self.done_fell(),
            flashing: self.is_flashing(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Update
    // ═══════════════════════════════════════════════════════════════════════

    /// Advance the timer to clock value `now`. Returns `done`.
    pub fn update(&mut self, now: Tick) -> bool {
        match self.behavior {
            Behavior::OffDelay => self.update_inverted(now),
            _ => self.update_standard(now),
        }
    }

    fn update_standard(&mut self, now: Tick) -> bool {
        let delta = self.take_delta(now);

        if (self.enable || self.control) && self.accumulate(delta) {
            self.done = true;
        }

        let (inputs, outputs) = (self.inputs(), self.outputs());
        if self.behavior.should_clear(inputs, outputs) {
            self.done = false;
            self.accumulator = 0;
            // Drops the latch of a latched timer.
            self.control = false;
        }

        self.sample_done_edges();
        self.running = (self.enable || self.control) && !self.done && !self.reset;
        self.done
    }

    /// Off-delay: runs while enable is false, done goes false at preset.
    fn update_inverted(&mut self, now: Tick) -> bool {
        let delta = self.take_delta(now);
        let run = !self.enable;

        if run && self.accumulate(delta) {
            self.done = false;
        }

        let (inputs, outputs) = (self.inputs(), self.outputs());
        if self.behavior.should_clear(inputs, outputs) {
            self.done = true;
            self.accumulator = 0;
        }

        self.sample_done_edges();
        self.running = run && self.done && !self.reset;
        self.done
    }

    fn take_delta(&mut self, now: Tick) -> Tick {
        let delta = elapsed(now, self.last_tick);
        self.last_tick = now;
        delta
    }

    /// Add `delta` to the accumulator, clamping at preset. Returns true once
    /// preset is reached.
    fn accumulate(&mut self, delta: Tick) -> bool {
        self.accumulator = self.accumulator.saturating_add(delta);
        if self.accumulator >= self.preset {
            self.accumulator = self.preset;
            true
        } else {
            false
        }
    }

    fn sample_done_edges(&mut self) {
        self.done_edge.sample(self.done);
        if self.done_edge.rose() {
            trace!(kind = %self.kind(), preset = self.preset, "done rose");
        } else if self.done_edge.fell() {
            trace!(kind = %self.kind(), preset = self.preset, "done fell");
        }
    }

    fn inputs(&self) -> Inputs {
        Inputs {
            enable: self.enable,
            reset: self.reset,
            control: self.control,
        }
    }

    fn outputs(&self) -> Outputs {
        Outputs {
            done: self.done,
            done_rose: self.done_edge.rose(),
        }
    }
}

/// Point-in-time view of a timer's inputs and outputs, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub kind: TimerKind,
    pub preset: Tick,
    pub count: Tick,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time: Option<Tick>,
    pub enable: bool,
    pub reset: bool,
    pub control: bool,
    pub done: bool,
    pub running: bool,
    pub done_rose: bool,
    pub done_fell: bool,
    pub flashing: bool,
}
