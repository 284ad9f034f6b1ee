//! Scenario loading and checkpoint verification

pub mod checkpoint;
pub mod scenario;

pub use checkpoint::{Checkpoint, CheckpointResult, CheckpointVerifier, VerificationResult};
pub use scenario::{InputChange, Scenario};
