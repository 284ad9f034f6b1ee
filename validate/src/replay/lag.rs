//! Scan jitter simulation
//!
//! A real control loop never hits its cycle time exactly: interrupt load and
//! bus traffic stretch some scans. This module adds extra ticks to each
//! cycle so scenarios can check that timers measure elapsed time, not scan
//! counts.

use multitimer_core::clock::Tick;

/// Deterministic generator of per-cycle overrun
#[derive(Debug, Clone)]
pub struct JitterSimulator {
    /// Maximum extra ticks per cycle (uniform over 0..=jitter_ms)
    jitter_ms: Tick,

    /// Probability of an overrun spike
    spike_probability: f32,

    /// Extra ticks added by a spike
    spike_ms: Tick,

    enabled: bool,

    /// LCG state, seeded for reproducible runs
    rng_state: u64,
}

impl Default for JitterSimulator {
    fn default() -> Self {
        Self {
            jitter_ms: 2,
            spike_probability: 0.01,
            spike_ms: 25,
            enabled: true,
            rng_state: 12345,
        }
    }
}

impl JitterSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jitter of up to `jitter_ms` per cycle, no spikes
    pub fn uniform(jitter_ms: Tick) -> Self {
        Self::custom(jitter_ms, 0.0, 0)
    }

    /// Simulator that never adds ticks
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn custom(jitter_ms: Tick, spike_probability: f32, spike_ms: Tick) -> Self {
        Self {
            jitter_ms,
            spike_probability,
            spike_ms,
            enabled: true,
            rng_state: 12345,
        }
    }

    /// Seed the RNG for deterministic behavior in tests
    pub fn seed(&mut self, seed: u64) {
        self.rng_state = seed;
    }

    /// Extra ticks for the next cycle
    pub fn next_jitter(&mut self) -> Tick {
        if !self.enabled {
            return 0;
        }

        let mut extra: Tick = 0;
        if self.jitter_ms > 0 {
            extra += (self.next_random() % (u64::from(self.jitter_ms) + 1)) as Tick;
        }

        let spike_roll = (self.next_random() % 10_000) as f32 / 10_000.0;
        if spike_roll < self.spike_probability {
            extra = extra.saturating_add(self.spike_ms);
        }

        extra
    }

    fn next_random(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        self.rng_state >> 33
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
