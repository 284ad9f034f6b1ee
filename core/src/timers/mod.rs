//! Timer system
//!
//! This module provides:
//! - **Timers**: scan-cycle timer instances sharing one update contract
//! - **Behaviors**: the per-kind reset policies (seven kinds)
//! - **Registry**: owns live timers and refreshes them all once per scan
//! - **Definitions**: TOML templates that build timers
//!
//! # Timer Kinds
//!
//! | Kind | Clears when |
//! |---|---|
//! | On-delay | reset, or enable false |
//! | Off-delay | reset, or enable true (inverted run and done) |
//! | Retentive | reset |
//! | Pulse generator | reset, or its own done rising edge |
//! | Latched | reset while done |
//! | Retriggerable | reset, or any change of control |
//! | Flasher | enable false, or its own done rising edge |

mod behavior;
mod definition;
mod edge;
mod error;
pub mod loader;
mod observer;
mod registry;
mod timer;

#[cfg(test)]
mod timer_tests;

pub use definition::{TimerDefinition, TimerFile};
pub use edge::OneShot;
pub use error::TimerError;
pub use loader::{load_definitions, load_definitions_from_dir, load_definitions_from_file};
pub use observer::{LogTeardown, TeardownObserver};
pub use registry::{Iter, TimerId, TimerRegistry};
pub use timer::{Timer, TimerSnapshot};
