//! Scenario files
//!
//! A scenario bundles timer definitions, a script of input changes keyed by
//! scan cycle, and the checkpoints to verify along the way.

use std::collections::HashSet;
use std::path::Path;

use multitimer_core::{Tick, Timer, TimerDefinition};
use serde::{Deserialize, Serialize};

use super::Checkpoint;

/// Input changes applied to one timer just before a cycle's refresh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputChange {
    /// Cycle whose refresh sees this change (1 = first scan)
    pub cycle: u64,

    /// Timer definition ID
    pub timer: String,

    #[serde(default)]
    pub enable: Option<bool>,

    #[serde(default)]
    pub reset: Option<bool>,

    #[serde(default)]
    pub control: Option<bool>,

    /// Latched start pulse
    #[serde(default)]
    pub start: bool,

    /// New flasher on-time
    #[serde(default)]
    pub on_time_ms: Option<Tick>,
}

impl InputChange {
    pub fn apply(&self, timer: &mut Timer) {
        if let Some(enable) = self.enable {
            timer.set_enable(enable);
        }
        if let Some(reset) = self.reset {
            timer.set_reset(reset);
        }
        if let Some(control) = self.control {
            timer.set_control(control);
        }
        if self.start {
            timer.start(true);
        }
        if let Some(on_time) = self.on_time_ms {
            timer.set_on_time(on_time);
        }
    }

    /// Short human-readable list of what this change sets
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(enable) = self.enable {
            parts.push(format!("enable={}", enable));
        }
        if let Some(reset) = self.reset {
            parts.push(format!("reset={}", reset));
        }
        if let Some(control) = self.control {
            parts.push(format!("control={}", control));
        }
        if self.start {
            parts.push("start".to_string());
        }
        if let Some(on_time) = self.on_time_ms {
            parts.push(format!("on_time={}ms", on_time));
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Clock ticks per scan cycle
    #[serde(default = "default_tick_ms")]
    pub tick_ms: Tick,

    /// Number of scan cycles to run
    pub cycles: u64,
}

fn default_tick_ms() -> Tick {
    10
}

/// Full scenario file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub meta: ScenarioMeta,

    #[serde(default, rename = "timer")]
    pub timers: Vec<TimerDefinition>,

    #[serde(default, rename = "input")]
    pub inputs: Vec<InputChange>,

    #[serde(default, rename = "checkpoint")]
    pub checkpoints: Vec<Checkpoint>,
}

impl Scenario {
    /// Load a scenario from a TOML file and check it for consistency
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        scenario.inputs.sort_by_key(|input| input.cycle);
        scenario.checkpoints.sort_by_key(|checkpoint| checkpoint.cycle);
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), String> {
        let mut ids = HashSet::new();
        for def in &self.timers {
            def.validate()?;
            if !ids.insert(def.id.as_str()) {
                return Err(format!("duplicate timer id '{}'", def.id));
            }
        }

        for input in &self.inputs {
            if !ids.contains(input.timer.as_str()) {
                return Err(format!(
                    "input at cycle {} names unknown timer '{}'",
                    input.cycle, input.timer
                ));
            }
            if input.cycle == 0 {
                return Err(format!(
                    "input for '{}' uses cycle 0, inputs start at cycle 1",
                    input.timer
                ));
            }
        }

        for checkpoint in &self.checkpoints {
            if !ids.contains(checkpoint.timer.as_str()) {
                return Err(format!(
                    "checkpoint at cycle {} names unknown timer '{}'",
                    checkpoint.cycle, checkpoint.timer
                ));
            }
        }

        Ok(())
    }
}
