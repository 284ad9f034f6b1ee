use std::collections::HashMap;
use std::path::{Path, PathBuf};

use multitimer_core::timers::load_definitions;
use multitimer_core::{
    LogTeardown, ManualClock, Tick, TimeSource, Timer, TimerError, TimerId, TimerRegistry,
};
use multitimer_types::BenchConfig;
use thiserror::Error;
use tracing::{debug, warn};

pub const APP_NAME: &str = "multitimer";

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("no timer named '{0}'")]
    UnknownTimer(String),

    #[error("a timer named '{0}' already exists")]
    DuplicateName(String),

    #[error("no path given and no definitions_dir configured")]
    NoDefinitionsPath,

    #[error(transparent)]
    Definitions(#[from] TimerError),
}

/// Direction of a done-flag transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rose,
    Fell,
}

/// One done edge seen during a `step`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeEvent {
    pub cycle: u64,
    pub tick: Tick,
    pub name: String,
    pub edge: Edge,
}

/// Everything the bench owns: settings, the manual scan clock and the timers.
#[derive(Debug)]
pub struct BenchState {
    pub config: BenchConfig,
    pub clock: ManualClock,
    registry: TimerRegistry,
    ids: HashMap<String, TimerId>,
    names: HashMap<TimerId, String>,
    cycle: u64,
}

impl BenchState {
    /// Load persisted settings, falling back to defaults.
    pub fn new() -> Self {
        let config = confy::load(APP_NAME, None).unwrap_or_else(|err| {
            warn!(error = %err, "failed to load bench config, using defaults");
            BenchConfig::default()
        });
        Self::with_config(config)
    }

    pub fn with_config(config: BenchConfig) -> Self {
        let registry = if config.log_teardown {
            TimerRegistry::with_teardown_observer(LogTeardown)
        } else {
            TimerRegistry::new()
        };
        Self {
            config,
            clock: ManualClock::new(),
            registry,
            ids: HashMap::new(),
            names: HashMap::new(),
            cycle: 0,
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn clock_now(&self) -> Tick {
        self.clock.now()
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    /// Name a timer and join it to the registry.
    ///
    /// The timer is re-baselined on the bench clock so it does not see the
    /// whole uptime as its first delta.
    pub fn add(&mut self, name: &str, mut timer: Timer) -> Result<TimerId, BenchError> {
        if self.ids.contains_key(name) {
            return Err(BenchError::DuplicateName(name.to_string()));
        }
        timer.sync_clock(self.clock.now());
        let id = self.registry.join(timer);
        self.ids.insert(name.to_string(), id);
        self.names.insert(id, name.to_string());
        Ok(id)
    }

    pub fn remove(&mut self, name: &str) -> Result<Timer, BenchError> {
        let id = self
            .ids
            .remove(name)
            .ok_or_else(|| BenchError::UnknownTimer(name.to_string()))?;
        self.names.remove(&id);
        self.registry
            .leave(id)
            .ok_or_else(|| BenchError::UnknownTimer(name.to_string()))
    }

    pub fn timer(&self, name: &str) -> Result<&Timer, BenchError> {
        self.ids
            .get(name)
            .and_then(|id| self.registry.get(*id))
            .ok_or_else(|| BenchError::UnknownTimer(name.to_string()))
    }

    pub fn timer_mut(&mut self, name: &str) -> Result<&mut Timer, BenchError> {
        self.ids
            .get(name)
            .and_then(|id| self.registry.get_mut(*id))
            .ok_or_else(|| BenchError::UnknownTimer(name.to_string()))
    }

    pub fn name_of(&self, id: TimerId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Load definitions from `path` (or the configured directory) and join
    /// every timer. Nothing is joined if any id clashes with an existing name.
    pub fn load(&mut self, path: Option<&Path>) -> Result<usize, BenchError> {
        let path = match (path, self.config.definitions_dir.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(dir)) => PathBuf::from(dir),
            (None, None) => return Err(BenchError::NoDefinitionsPath),
        };

        let definitions = load_definitions(&path)?;
        if let Some(clash) = definitions.iter().find(|def| self.ids.contains_key(&def.id)) {
            return Err(BenchError::DuplicateName(clash.id.clone()));
        }

        for def in &definitions {
            self.add(&def.id, def.build())?;
        }
        debug!(path = %path.display(), count = definitions.len(), "definitions joined");
        Ok(definitions.len())
    }

    /// Run `cycles` scans, advancing the clock by `ticks` before each one.
    /// Returns every done edge in scan order.
    pub fn step(&mut self, cycles: u32, ticks: Tick) -> Vec<EdgeEvent> {
        let mut events = Vec::new();
        for _ in 0..cycles {
            self.clock.advance(ticks);
            self.cycle += 1;

            let cycle = self.cycle;
            let now = self.clock.now();
            let names = &self.names;
            self.registry.refresh_all_with(now, |id, timer| {
                let edge = if timer.done_rose() {
                    Edge::Rose
                } else if timer.done_fell() {
                    Edge::Fell
                } else {
                    return;
                };
                events.push(EdgeEvent {
                    cycle,
                    tick: now,
                    name: names.get(&id).cloned().unwrap_or_else(|| id.to_string()),
                    edge,
                });
            });
        }
        events
    }
}

impl Default for BenchState {
    fn default() -> Self {
        Self::new()
    }
}
