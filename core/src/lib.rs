pub mod clock;
pub mod timers;

// Re-exports for convenience
pub use clock::{ManualClock, Tick, TimeSource, WallClock};
pub use multitimer_types::TimerKind;
pub use timers::{
    LogTeardown, TeardownObserver, Timer, TimerDefinition, TimerError, TimerId, TimerRegistry,
    TimerSnapshot,
};
