//! Checkpoint-based timer verification
//!
//! A checkpoint names a timer, a scan cycle, and the outputs expected right
//! after that cycle's refresh. Unset fields are not checked. Cycle 0 checks
//! the state before the first scan.

use multitimer_core::{Tick, TimerSnapshot};
use serde::{Deserialize, Serialize};

/// Expected timer state after one cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    pub cycle: u64,

    /// Timer definition ID
    pub timer: String,

    #[serde(default)]
    pub done: Option<bool>,

    #[serde(default)]
    pub running: Option<bool>,

    /// Done rose during this cycle
    #[serde(default)]
    pub rose: Option<bool>,

    /// Done fell during this cycle
    #[serde(default)]
    pub fell: Option<bool>,

    /// Expected accumulator value in ticks
    #[serde(default)]
    pub count: Option<Tick>,

    /// Flasher auxiliary output
    #[serde(default)]
    pub flashing: Option<bool>,

    /// Optional description for debugging
    #[serde(default)]
    pub description: Option<String>,
}

impl Checkpoint {
    /// Compare against an actual snapshot, one message per mismatch
    pub fn failures(&self, actual: &TimerSnapshot) -> Vec<String> {
        let flags = [
            ("done", self.done, actual.done),
            ("running", self.running, actual.running),
            ("rose", self.rose, actual.done_rose),
            ("fell", self.fell, actual.done_fell),
            ("flashing", self.flashing, actual.flashing),
        ];

        let mut failures: Vec<String> = flags
            .iter()
            .filter_map(|&(field, expected, actual)| match expected {
                Some(expected) if expected != actual => Some(format!(
                    "Timer '{}' {} is {} but expected {}",
                    self.timer, field, actual, expected
                )),
                _ => None,
            })
            .collect();

        if let Some(count) = self.count.filter(|&count| count != actual.count) {
            failures.push(format!(
                "Timer '{}' count is {} but expected {}",
                self.timer, actual.count, count
            ));
        }

        failures
    }
}

/// Result of verifying a single checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointResult {
    pub checkpoint_idx: usize,
    pub cycle: u64,
    pub timer: String,
    pub description: Option<String>,
    pub passed: bool,
    pub failures: Vec<String>,
}

/// Overall verification result
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub checkpoints_passed: u32,
    pub checkpoints_total: u32,
    pub results: Vec<CheckpointResult>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checkpoints_passed == self.checkpoints_total
    }
}

/// Walks a cycle-sorted checkpoint list alongside the replay
#[derive(Debug)]
pub struct CheckpointVerifier {
    checkpoints: Vec<Checkpoint>,
    current_checkpoint_idx: usize,
    results: Vec<CheckpointResult>,
}

impl CheckpointVerifier {
    /// `checkpoints` must be sorted by cycle.
    pub fn new(checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            checkpoints,
            current_checkpoint_idx: 0,
            results: Vec::new(),
        }
    }

    /// Verify every checkpoint due at or before `cycle`.
    ///
    /// `lookup` resolves a timer id to its current snapshot.
    pub fn check_cycle<F>(&mut self, cycle: u64, lookup: F) -> Vec<CheckpointResult>
    where
        F: Fn(&str) -> Option<TimerSnapshot>,
    {
        let mut due = Vec::new();

        while let Some(checkpoint) = self.checkpoints.get(self.current_checkpoint_idx) {
            if checkpoint.cycle > cycle {
                break;
            }

            let failures = match lookup(&checkpoint.timer) {
                Some(snapshot) if checkpoint.cycle == cycle => checkpoint.failures(&snapshot),
                Some(_) => vec![format!(
                    "Checkpoint for '{}' at cycle {} was skipped",
                    checkpoint.timer, checkpoint.cycle
                )],
                None => vec![format!("Timer '{}' is not registered", checkpoint.timer)],
            };

            let result = CheckpointResult {
                checkpoint_idx: self.current_checkpoint_idx,
                cycle: checkpoint.cycle,
                timer: checkpoint.timer.clone(),
                description: checkpoint.description.clone(),
                passed: failures.is_empty(),
                failures,
            };
            self.results.push(result.clone());
            due.push(result);
            self.current_checkpoint_idx += 1;
        }

        due
    }

    /// Final result. Checkpoints past the end of the replay count as failed.
    pub fn finalize(mut self) -> VerificationResult {
        for (idx, checkpoint) in self
            .checkpoints
            .iter()
            .enumerate()
            .skip(self.current_checkpoint_idx)
        {
            self.results.push(CheckpointResult {
                checkpoint_idx: idx,
                cycle: checkpoint.cycle,
                timer: checkpoint.timer.clone(),
                description: checkpoint.description.clone(),
                passed: false,
                failures: vec![format!(
                    "Checkpoint at cycle {} was never reached",
                    checkpoint.cycle
                )],
            });
        }

        let passed = self.results.iter().filter(|r| r.passed).count() as u32;
        let total = self.results.len() as u32;

        VerificationResult {
            checkpoints_passed: passed,
            checkpoints_total: total,
            results: self.results,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_checkpoint_idx >= self.checkpoints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multitimer_core::Timer;

    fn done_at(cycle: u64) -> Checkpoint {
        Checkpoint {
            cycle,
            timer: "pump".to_string(),
            done: Some(true),
            rose: Some(true),
            ..Default::default()
        }
    }

    /// On-delay timer with preset 3 after `scans` unit-step scans
    fn pump_after(scans: u32) -> TimerSnapshot {
        let mut timer = Timer::on_delay(3);
        timer.set_enable(true);
        for now in 1..=scans {
            timer.update(now);
        }
        timer.snapshot()
    }

    #[test]
    fn test_checkpoint_pass() {
        let mut verifier = CheckpointVerifier::new(vec![done_at(3)]);

        assert!(verifier.check_cycle(2, |_| Some(pump_after(2))).is_empty());

        let results = verifier.check_cycle(3, |_| Some(pump_after(3)));
        assert_eq!(results.len(), 1);
        assert!(results[0].passed, "Failures: {:?}", results[0].failures);
        assert!(verifier.is_complete());
        assert!(verifier.finalize().passed());
    }

    #[test]
    fn test_checkpoint_fail_reports_each_field() {
        let mut checkpoint = done_at(2);
        checkpoint.count = Some(3);
        let mut verifier = CheckpointVerifier::new(vec![checkpoint]);

        let results = verifier.check_cycle(2, |_| Some(pump_after(2)));
        let r = &results[0];
        assert!(!r.passed);
        assert_eq!(r.failures.len(), 3, "{:?}", r.failures);
        assert!(r.failures.iter().any(|f| f.contains("done is false")));
        assert!(r.failures.iter().any(|f| f.contains("count is 2")));
    }

    #[test]
    fn test_unknown_timer_fails() {
        let mut verifier = CheckpointVerifier::new(vec![done_at(1)]);
        let results = verifier.check_cycle(1, |_| None);
        assert!(!results[0].passed);
        assert!(results[0].failures[0].contains("not registered"));
    }

    #[test]
    fn test_unreached_checkpoint_fails_on_finalize() {
        let mut verifier = CheckpointVerifier::new(vec![done_at(3), done_at(50)]);
        verifier.check_cycle(3, |_| Some(pump_after(3)));
        assert!(!verifier.is_complete());

        let result = verifier.finalize();
        assert_eq!(result.checkpoints_total, 2);
        assert_eq!(result.checkpoints_passed, 1);
        assert!(result.results[1].failures[0].contains("never reached"));
    }
}
