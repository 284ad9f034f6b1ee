//! Timer definition types
//!
//! Definitions are loaded from TOML config files and describe which timers
//! a program needs. `build` turns one into a ready-to-join `Timer`.

use multitimer_types::TimerKind;
use serde::{Deserialize, Serialize};

use super::Timer;
use crate::clock::Tick;

/// Definition of a timer (loaded from config)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDefinition {
    /// Unique identifier for this timer
    pub id: String,

    /// Display name (falls back to `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub kind: TimerKind,

    /// Target duration in clock ticks (milliseconds)
    pub preset_ms: Tick,

    /// Flasher on-time in clock ticks. Required for flashers, rejected for
    /// every other kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_time_ms: Option<Tick>,

    /// Initial state of the enable input
    #[serde(default)]
    pub enabled: bool,
}

impl TimerDefinition {
    pub fn new(id: impl Into<String>, kind: TimerKind, preset_ms: Tick) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            preset_ms,
            on_time_ms: None,
            enabled: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Check the definition for inconsistencies. Returns the reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("timer id must not be empty".to_string());
        }
        match (self.kind.has_on_time(), self.on_time_ms) {
            (true, None) => Err(format!(
                "{} timer '{}' needs on_time_ms",
                self.kind, self.id
            )),
            (false, Some(_)) => Err(format!(
                "on_time_ms is only meaningful for flashers, '{}' is {}",
                self.id, self.kind
            )),
            _ => Ok(()),
        }
    }

    /// Build the runtime timer with this definition's initial inputs.
    pub fn build(&self) -> Timer {
        let mut timer =
            Timer::with_on_time(self.kind, self.preset_ms, self.on_time_ms.unwrap_or(0));
        timer.set_enable(self.enabled);
        timer
    }
}

/// Top-level layout of a timer definitions file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerFile {
    #[serde(default, rename = "timer")]
    pub timers: Vec<TimerDefinition>,
}
