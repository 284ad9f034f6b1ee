//! Replay engine for scenario validation
//!
//! Provides the scan clock and per-cycle jitter used to drive a registry
//! through a scripted sequence of cycles.

pub mod clock;
pub mod lag;

pub use clock::ScanClock;
pub use lag::JitterSimulator;
