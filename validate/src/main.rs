//! Scenario validation CLI for multitimer
//!
//! Replays a scripted sequence of scan cycles through a timer registry and
//! verifies timer outputs at checkpoints:
//! - Accelerated mode (default): fast CI validation with virtual time
//! - Realtime mode (1x): watch edges appear at their real pace
//! - Jitter: stretch cycles to check that timers follow elapsed time

mod output;
mod replay;
mod verification;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use multitimer_core::{
    LogTeardown, Tick, TimeSource, TimerId, TimerKind, TimerRegistry, TimerSnapshot,
};

use crate::output::{CliOutput, OutputLevel};
use crate::replay::{JitterSimulator, ScanClock};
use crate::verification::{CheckpointVerifier, Scenario};

// ═══════════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ReplayMode {
    /// 1x speed with actual timing delays
    Realtime,
    /// Fast replay with virtual time (default)
    #[default]
    Accelerated,
}

#[derive(Parser, Debug)]
#[command(name = "multitimer-validate")]
#[command(about = "Replay timer scenarios and verify checkpoints")]
#[command(version)]
struct Args {
    /// Path to scenario TOML file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Override the scenario's cycle count
    #[arg(short, long)]
    cycles: Option<u64>,

    /// First clock reading (set near u32::MAX to replay across a wraparound)
    #[arg(long, default_value_t = 0)]
    start_tick: Tick,

    // ─────────────────────────────────────────────────────────────────────────
    // Replay Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Replay mode
    #[arg(long, value_enum, default_value_t = ReplayMode::Accelerated)]
    mode: ReplayMode,

    /// Custom speed multiplier (overrides --mode)
    #[arg(long)]
    speed: Option<f32>,

    /// Add up to this many extra ticks to every cycle
    #[arg(long)]
    jitter: Option<Tick>,

    /// Simulate scan overruns with the default jitter profile
    #[arg(long)]
    simulate_jitter: bool,

    /// Jitter RNG seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Output Mode
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet mode: summary only
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode: show input changes, every cycle and teardown
    #[arg(short, long)]
    verbose: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════════

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let output_level = if args.quiet {
        OutputLevel::Quiet
    } else if args.verbose {
        OutputLevel::Verbose
    } else {
        OutputLevel::Normal
    };
    let mut cli = CliOutput::new(output_level);

    let speed = args.speed.unwrap_or(match args.mode {
        ReplayMode::Realtime => 1.0,
        ReplayMode::Accelerated => 0.0, // Instant
    });

    let scenario = Scenario::load(&args.scenario)?;
    let cycles = args.cycles.unwrap_or(scenario.meta.cycles);

    let mut clock = ScanClock::starting_at(args.start_tick, scenario.meta.tick_ms, speed);
    let mut jitter = match args.jitter {
        Some(ms) => JitterSimulator::uniform(ms),
        None if args.simulate_jitter => JitterSimulator::new(),
        None => JitterSimulator::disabled(),
    };
    jitter.seed(args.seed);

    if !args.quiet {
        eprintln!(
            "Replaying {} cycles at {}ms/cycle, speed: {}, jitter: {}",
            cycles,
            clock.tick_ms(),
            if clock.is_instant_mode() {
                "instant".to_string()
            } else {
                format!("{:.1}", clock.speed())
            },
            if jitter.is_enabled() { "on" } else { "off" }
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────

    let mut registry = TimerRegistry::new();
    if args.verbose {
        registry.set_teardown_observer(LogTeardown);
    }

    let mut ids: HashMap<String, TimerId> = HashMap::new();
    let mut labels: HashMap<TimerId, (String, TimerKind)> = HashMap::new();

    cli.scenario_start(
        &scenario.meta.name,
        scenario.meta.description.as_deref(),
        scenario.timers.len(),
    );
    for def in &scenario.timers {
        let mut timer = def.build();
        timer.sync_clock(clock.now());
        let id = registry.join(timer);
        ids.insert(def.id.clone(), id);
        labels.insert(id, (def.id.clone(), def.kind));
        cli.timer_joined(&def.id, def.kind, def.preset_ms);
    }

    let mut verifier = CheckpointVerifier::new(scenario.checkpoints.clone());
    for result in verifier.check_cycle(0, |name| snapshot_of(&registry, &ids, name)) {
        cli.checkpoint(clock.elapsed_ms(), &result);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replay
    // ─────────────────────────────────────────────────────────────────────────

    let mut inputs = scenario.inputs.iter().peekable();
    for cycle in 1..=cycles {
        while let Some(change) = inputs.next_if(|change| change.cycle == cycle) {
            if let Some(timer) = ids.get(&change.timer).and_then(|id| registry.get_mut(*id)) {
                change.apply(timer);
                cli.input(clock.elapsed_ms(), cycle, &change.timer, &change.describe());
            }
        }

        let now = clock.advance(jitter.next_jitter());

        let mut edges: Vec<(TimerId, bool)> = Vec::new();
        registry.refresh_all_with(now, |id, timer| {
            if timer.done_rose() {
                edges.push((id, true));
            } else if timer.done_fell() {
                edges.push((id, false));
            }
        });

        for (id, rose) in edges {
            let Some((name, kind)) = labels.get(&id) else {
                continue;
            };
            if rose {
                cli.done_rose(clock.elapsed_ms(), cycle, name, *kind);
            } else {
                cli.done_fell(clock.elapsed_ms(), cycle, name, *kind);
            }
        }

        for result in verifier.check_cycle(cycle, |name| snapshot_of(&registry, &ids, name)) {
            cli.checkpoint(clock.elapsed_ms(), &result);
        }

        cli.cycle_end(clock.elapsed_ms(), cycle, now);
    }
    cli.flush();

    debug!(
        cycles = clock.cycle(),
        elapsed_ms = clock.elapsed_ms(),
        unapplied_inputs = inputs.count(),
        "replay finished"
    );
    registry.clear();

    // ─────────────────────────────────────────────────────────────────────────
    // Summary
    // ─────────────────────────────────────────────────────────────────────────

    let result = verifier.finalize();
    let has_checkpoints = result.checkpoints_total > 0;
    cli.print_summary(has_checkpoints.then_some((result.checkpoints_passed, result.checkpoints_total)));

    if !args.quiet {
        for failed in result.results.iter().filter(|r| !r.passed) {
            eprintln!(
                "checkpoint #{} (cycle {}, '{}'): {}",
                failed.checkpoint_idx,
                failed.cycle,
                failed.timer,
                failed.failures.join("; ")
            );
        }
    }

    // Exit with error code if verification failed
    if !result.passed() {
        std::process::exit(1);
    }

    Ok(())
}

fn snapshot_of(
    registry: &TimerRegistry,
    ids: &HashMap<String, TimerId>,
    name: &str,
) -> Option<TimerSnapshot> {
    ids.get(name)
        .and_then(|id| registry.get(*id))
        .map(|timer| timer.snapshot())
}

/// `RUST_LOG` wins when set; otherwise warnings only, or info with `--verbose`
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
