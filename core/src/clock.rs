//! Clock sources for scan-cycle timers
//!
//! Timers never read a clock themselves. The driver samples a `TimeSource`
//! once per scan and hands the tick value to `update` / `refresh_all`.
//!
//! Ticks are a wrapping 32-bit millisecond counter, the same shape as an
//! embedded uptime counter. Deltas are taken with wrapping subtraction so a
//! single rollover between two samples still yields the right elapsed time.

use std::cell::Cell;
use std::time::Instant;

/// One clock tick (milliseconds by convention).
pub type Tick = u32;

/// Elapsed ticks between two samples, correct across one counter wraparound.
#[inline]
pub fn elapsed(now: Tick, last: Tick) -> Tick {
    now.wrapping_sub(last)
}

/// Monotonically non-decreasing (modulo wraparound) tick source.
pub trait TimeSource {
    /// Returns the current tick.
    fn now(&self) -> Tick;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Tick {
        (**self).now()
    }
}

/// Wall clock source counting milliseconds since creation.
#[derive(Debug, Clone)]
pub struct WallClock {
    epoch: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Tick {
        // Truncation is the wraparound.
        self.epoch.elapsed().as_millis() as Tick
    }
}

/// Manually driven clock for simulation and tests.
///
/// Interior mutability lets the driver advance the clock while timers and
/// the registry only ever see it through `&dyn TimeSource`.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Tick>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock reading `start`
    pub fn starting_at(start: Tick) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute tick value
    pub fn set(&self, tick: Tick) {
        self.now.set(tick);
    }

    /// Advance by `ticks`, wrapping at the counter limit. Returns the new value.
    pub fn advance(&self, ticks: Tick) -> Tick {
        let next = self.now.get().wrapping_add(ticks);
        self.now.set(next);
        next
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Tick {
        self.now.get()
    }
}
