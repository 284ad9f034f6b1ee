//! Scan clock for scenario replay
//!
//! Each scan cycle advances the clock by the scenario's fixed `tick_ms`
//! plus any simulated jitter. The clock can optionally pace itself against
//! wall time:
//! - Instant (speed 0): no sleeping, fastest replay
//! - Realtime (speed 1): one clock tick per wall-clock millisecond
//! - Custom speed: any multiplier (0.5x slow-mo, 10x fast-forward, etc.)

use std::time::Duration;

use multitimer_core::clock::{Tick, TimeSource};

/// Clock driven by the replay loop, one `advance` per scan cycle
#[derive(Debug)]
pub struct ScanClock {
    /// Nominal ticks per cycle
    tick_ms: Tick,

    /// Current tick value as the timers see it (wraps)
    now: Tick,

    /// Total ticks since the start of the replay (does not wrap)
    elapsed_ms: u64,

    /// Completed scan cycles
    cycle: u64,

    /// Speed multiplier (1.0 = realtime, 0.0 = instant, 10.0 = 10x speed)
    speed_multiplier: f32,
}

impl ScanClock {
    pub fn new(tick_ms: Tick, speed_multiplier: f32) -> Self {
        Self::starting_at(0, tick_ms, speed_multiplier)
    }

    /// Clock whose first reading is `start`. Used to replay across a
    /// counter wraparound.
    pub fn starting_at(start: Tick, tick_ms: Tick, speed_multiplier: f32) -> Self {
        Self {
            tick_ms,
            now: start,
            elapsed_ms: 0,
            cycle: 0,
            speed_multiplier,
        }
    }

    /// Clock for instant (accelerated) replay
    pub fn instant(tick_ms: Tick) -> Self {
        Self::new(tick_ms, 0.0)
    }

    /// Clock for realtime (1x) replay
    pub fn realtime(tick_ms: Tick) -> Self {
        Self::new(tick_ms, 1.0)
    }

    /// Start the next cycle: advance by one tick step plus `extra` ticks,
    /// sleeping first when pacing is on. Returns the new reading.
    pub fn advance(&mut self, extra: Tick) -> Tick {
        let delta = self.tick_ms.saturating_add(extra);

        if self.speed_multiplier > 0.0 {
            let sleep_ms = (delta as f32 / self.speed_multiplier) as u64;
            if sleep_ms > 0 {
                std::thread::sleep(Duration::from_millis(sleep_ms));
            }
        }

        self.now = self.now.wrapping_add(delta);
        self.elapsed_ms += u64::from(delta);
        self.cycle += 1;
        self.now
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tick_ms(&self) -> Tick {
        self.tick_ms
    }

    /// Format elapsed replay time as MM:SS.ss
    pub fn format_elapsed(&self) -> String {
        format_ms(self.elapsed_ms)
    }

    /// Check if we're in instant (accelerated) mode
    pub fn is_instant_mode(&self) -> bool {
        self.speed_multiplier == 0.0
    }

    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }
}

impl TimeSource for ScanClock {
    fn now(&self) -> Tick {
        self.now
    }
}

/// Format a millisecond duration as MM:SS.ss
pub fn format_ms(ms: u64) -> String {
    let mins = ms / 60_000;
    let secs = (ms % 60_000) as f32 / 1000.0;
    format!("{:02}:{:05.2}", mins, secs)
}
