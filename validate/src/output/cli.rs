//! Colored CLI output for scenario replay
//!
//! Formats done edges, input changes and checkpoint results with colored
//! output for easy visual parsing. Colors are only used on a terminal.

use std::io::{self, Write};

use multitimer_types::TimerKind;

use crate::replay::clock::format_ms;
use crate::verification::CheckpointResult;

/// Output verbosity level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum OutputLevel {
    /// Only show summary at end
    Quiet,
    /// Show done edges and checkpoint results (default)
    #[default]
    Normal,
    /// Also show input changes and per-cycle ticks
    Verbose,
}

/// CLI output formatter with color support
#[derive(Debug)]
pub struct CliOutput {
    level: OutputLevel,
    use_colors: bool,
    cycles_run: u64,
    rising_edges: u32,
    falling_edges: u32,
    inputs_applied: u32,
    checkpoint_failures: u32,
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new(OutputLevel::Normal)
    }
}

impl CliOutput {
    pub fn new(level: OutputLevel) -> Self {
        Self {
            level,
            use_colors: atty::is(atty::Stream::Stdout),
            cycles_run: 0,
            rising_edges: 0,
            falling_edges: 0,
            inputs_applied: 0,
            checkpoint_failures: 0,
        }
    }

    /// Prefix for one line of output: elapsed time and cycle number
    fn stamp(&self, elapsed_ms: u64, cycle: u64) -> String {
        format!("[{} #{:>5}]", format_ms(elapsed_ms), cycle)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ANSI Color Codes
    // ═══════════════════════════════════════════════════════════════════════════

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint("36", text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Output
    // ═══════════════════════════════════════════════════════════════════════════

    /// Announce the scenario before replay starts
    pub fn scenario_start(&mut self, name: &str, description: Option<&str>, timers: usize) {
        if self.level < OutputLevel::Normal {
            return;
        }

        let label = self.bold(&self.green(&format!("═══ {} ═══", name)));
        println!("\n{}", label);
        if let Some(description) = description {
            println!("{}", self.dim(description));
        }
        println!("{} timers\n", timers);
    }

    /// Log a timer joining the registry
    pub fn timer_joined(&mut self, id: &str, kind: TimerKind, preset: u32) {
        if self.level < OutputLevel::Verbose {
            return;
        }

        let marker = self.cyan("+++");
        let label = self.cyan("JOIN:");
        println!("{} {} \"{}\" {} preset {}ms", marker, label, id, kind, preset);
    }

    /// Log an input change applied before a cycle
    pub fn input(&mut self, elapsed_ms: u64, cycle: u64, timer: &str, change: &str) {
        self.inputs_applied += 1;
        if self.level < OutputLevel::Verbose {
            return;
        }

        let stamp = self.stamp(elapsed_ms, cycle);
        let marker = self.cyan("~~~");
        println!("{} {} \"{}\" {}", stamp, marker, timer, change);
    }

    /// Log done going true
    pub fn done_rose(&mut self, elapsed_ms: u64, cycle: u64, timer: &str, kind: TimerKind) {
        self.rising_edges += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let stamp = self.stamp(elapsed_ms, cycle);
        let arrow = self.green("-->");
        let label = self.green("DONE ROSE:");
        let kind = self.dim(&format!("[{}]", kind.as_str()));
        println!("{} {} {} \"{}\" {}", stamp, arrow, label, timer, kind);
    }

    /// Log done going false
    pub fn done_fell(&mut self, elapsed_ms: u64, cycle: u64, timer: &str, kind: TimerKind) {
        self.falling_edges += 1;
        if self.level < OutputLevel::Normal {
            return;
        }

        let stamp = self.stamp(elapsed_ms, cycle);
        let arrow = self.yellow("<--");
        let label = self.yellow("DONE FELL:");
        let kind = self.dim(&format!("[{}]", kind.as_str()));
        println!("{} {} {} \"{}\" {}", stamp, arrow, label, timer, kind);
    }

    /// Log one checkpoint verdict
    pub fn checkpoint(&mut self, elapsed_ms: u64, result: &CheckpointResult) {
        if !result.passed {
            self.checkpoint_failures += 1;
        }
        if self.level < OutputLevel::Normal {
            return;
        }

        let stamp = self.stamp(elapsed_ms, result.cycle);
        let description = result
            .description
            .as_deref()
            .map(|d| format!(" - {}", d))
            .unwrap_or_default();

        if result.passed {
            let label = self.green("CHECK OK:");
            println!("{} {} \"{}\"{}", stamp, label, result.timer, description);
        } else {
            let label = self.red("CHECK FAILED:");
            println!("{} {} \"{}\"{}", stamp, label, result.timer, description);
            for failure in &result.failures {
                println!("    {}", self.red(failure));
            }
        }
    }

    /// Log a verbose per-cycle line
    pub fn cycle_end(&mut self, elapsed_ms: u64, cycle: u64, now: u32) {
        self.cycles_run = cycle;
        if self.level < OutputLevel::Verbose {
            return;
        }

        let stamp = self.stamp(elapsed_ms, cycle);
        println!("{} {}", stamp, self.dim(&format!("tick {}", now)));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Summary Report
    // ═══════════════════════════════════════════════════════════════════════════

    /// Print final summary
    pub fn print_summary(&self, checkpoints_passed: Option<(u32, u32)>) {
        let line = "═".repeat(51);
        println!();
        println!("{}", line);
        println!("  SCENARIO SUMMARY");
        println!("{}", line);
        println!("Cycles Run:      {}", self.cycles_run);
        println!("Inputs Applied:  {}", self.inputs_applied);
        println!("Done Rose:       {}", self.rising_edges);
        println!("Done Fell:       {}", self.falling_edges);

        if let Some((passed, total)) = checkpoints_passed {
            let status = if passed == total {
                self.green(&format!("PASSED ({}/{})", passed, total))
            } else {
                self.red(&format!("FAILED ({}/{})", passed, total))
            };
            println!("Verification:    {}", status);
            if self.checkpoint_failures > 0 {
                println!("Failed Checks:   {}", self.red(&self.checkpoint_failures.to_string()));
            }
        }
        println!("{}", line);
    }

    pub fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_format() {
        let output = CliOutput::new(OutputLevel::Quiet);
        assert_eq!(output.stamp(15_230, 7), "[00:15.23 #    7]");
    }

    #[test]
    fn test_quiet_still_counts() {
        let mut output = CliOutput::new(OutputLevel::Quiet);
        output.done_rose(10, 1, "pump", TimerKind::OnDelay);
        output.done_fell(20, 2, "pump", TimerKind::OnDelay);
        output.input(0, 1, "pump", "enable=true");
        output.cycle_end(20, 2, 20);

        assert_eq!(output.rising_edges, 1);
        assert_eq!(output.falling_edges, 1);
        assert_eq!(output.inputs_applied, 1);
        assert_eq!(output.cycles_run, 2);
    }

    #[test]
    fn test_failed_checkpoint_counted() {
        let mut output = CliOutput::new(OutputLevel::Quiet);
        output.checkpoint(
            0,
            &CheckpointResult {
                checkpoint_idx: 0,
                cycle: 3,
                timer: "pump".to_string(),
                description: None,
                passed: false,
                failures: vec!["Timer 'pump' done is false but expected true".to_string()],
            },
        );
        assert_eq!(output.checkpoint_failures, 1);
    }
}
