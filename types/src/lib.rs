//! Shared configuration types for multitimer
//!
//! This crate contains serializable types that are shared between the timer
//! core (multitimer-core), the scan bench and the scenario validator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Timer Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The seven timer behaviors. They share one update contract and differ in
/// when they clear themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Runs while enabled, clears when enable drops or reset is set
    #[default]
    OnDelay,
    /// Done while enabled, drops done `preset` ticks after enable falls
    OffDelay,
    /// Keeps its accumulated value across enable toggles
    Retentive,
    /// Clears itself on its own done edge, producing a pulse train
    PulseGenerator,
    /// Started by a pulse, runs to preset regardless of enable
    Latched,
    /// Restarts on every transition of the control input
    Retriggerable,
    /// Pulse generator with an auxiliary on-time output
    Flasher,
}

impl TimerKind {
    pub const ALL: [TimerKind; 7] = [
        TimerKind::OnDelay,
        TimerKind::OffDelay,
        TimerKind::Retentive,
        TimerKind::PulseGenerator,
        TimerKind::Latched,
        TimerKind::Retriggerable,
        TimerKind::Flasher,
    ];

    /// Config-file spelling (`on_delay`, `pulse_generator`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::OnDelay => "on_delay",
            TimerKind::OffDelay => "off_delay",
            TimerKind::Retentive => "retentive",
            TimerKind::PulseGenerator => "pulse_generator",
            TimerKind::Latched => "latched",
            TimerKind::Retriggerable => "retriggerable",
            TimerKind::Flasher => "flasher",
        }
    }

    /// Human-readable label for tables and log lines
    pub fn label(&self) -> &'static str {
        match self {
            TimerKind::OnDelay => "on-delay",
            TimerKind::OffDelay => "off-delay",
            TimerKind::Retentive => "retentive",
            TimerKind::PulseGenerator => "pulse generator",
            TimerKind::Latched => "latched",
            TimerKind::Retriggerable => "retriggerable",
            TimerKind::Flasher => "flasher",
        }
    }

    /// Returns true if this kind reads the control input
    pub fn uses_control(&self) -> bool {
        matches!(
            self,
            TimerKind::Latched | TimerKind::Retriggerable | TimerKind::Flasher
        )
    }

    /// Returns true if this kind carries an on-time sub-duration
    pub fn has_on_time(&self) -> bool {
        matches!(self, TimerKind::Flasher)
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no timer kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimerKindError(pub String);

impl fmt::Display for ParseTimerKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown timer kind '{}'", self.0)
    }
}

impl std::error::Error for ParseTimerKindError {}

impl FromStr for TimerKind {
    type Err = ParseTimerKindError;

    /// Accepts the config spelling, dashes instead of underscores, and the
    /// short PLC mnemonics (`ton`, `tof`, `rto`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match normalized.as_str() {
            "on_delay" | "ton" => TimerKind::OnDelay,
            "off_delay" | "tof" => TimerKind::OffDelay,
            "retentive" | "rto" => TimerKind::Retentive,
            "pulse_generator" | "pulse" => TimerKind::PulseGenerator,
            "latched" => TimerKind::Latched,
            "retriggerable" => TimerKind::Retriggerable,
            "flasher" => TimerKind::Flasher,
            _ => return Err(ParseTimerKindError(s.to_string())),
        };
        Ok(kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bench Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted settings for the interactive scan bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Clock ticks added per scan cycle when `step` is given no explicit value
    #[serde(default = "default_tick_step")]
    pub tick_step_ms: u32,

    /// Log a line whenever a timer leaves the registry
    #[serde(default = "default_true")]
    pub log_teardown: bool,

    /// Directory searched by `load` when no path is given
    #[serde(default)]
    pub definitions_dir: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            tick_step_ms: default_tick_step(),
            log_teardown: true,
            definitions_dir: None,
        }
    }
}

fn default_tick_step() -> u32 {
    10
}

fn default_true() -> bool {
    true
}
