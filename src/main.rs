use clap::{Parser, Subcommand};
use std::io::Write;

use multitimer::{BenchState, commands, logging, readline};
use multitimer_core::{Tick, TimerKind};

fn main() -> Result<(), String> {
    logging::init();
    let mut state = BenchState::new();

    if state.config.definitions_dir.is_some() {
        if let Err(err) = commands::load(&mut state, None) {
            println!("failed to load configured definitions: {err}");
        }
    }

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut state) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "multitimer scan bench")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a timer and join it to the registry
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        kind: TimerKind,
        #[arg(short, long)]
        preset: Tick,
        #[arg(long)]
        on_time: Option<Tick>,
    },
    /// Join every timer from a definitions file or directory
    Load {
        #[arg(short, long)]
        path: Option<String>,
    },
    Remove {
        #[arg(short, long)]
        name: String,
    },
    /// Drive timer inputs
    Set {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        enable: Option<bool>,
        #[arg(short, long)]
        reset: Option<bool>,
        #[arg(short, long)]
        control: Option<bool>,
    },
    /// Start pulse for a latched timer
    Start {
        #[arg(short, long)]
        name: String,
    },
    OnTime {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        ms: Tick,
    },
    /// Advance the clock and refresh every timer
    Step {
        #[arg(short, long)]
        cycles: Option<u32>,
        #[arg(short, long)]
        ticks: Option<Tick>,
    },
    Show,
    Config,
    Exit,
}

fn respond(line: &str, state: &mut BenchState) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "multitimer".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let result = match cli.command {
        Some(Commands::Add {
            name,
            kind,
            preset,
            on_time,
        }) => commands::add_timer(state, &name, kind, preset, on_time),
        Some(Commands::Load { path }) => commands::load(state, path.as_deref()),
        Some(Commands::Remove { name }) => commands::remove_timer(state, &name),
        Some(Commands::Set {
            name,
            enable,
            reset,
            control,
        }) => commands::set_inputs(state, &name, enable, reset, control),
        Some(Commands::Start { name }) => commands::start(state, &name),
        Some(Commands::OnTime { name, ms }) => commands::set_on_time(state, &name, ms),
        Some(Commands::Step { cycles, ticks }) => {
            commands::step(state, cycles, ticks);
            Ok(())
        }
        Some(Commands::Show) => {
            commands::show(state);
            Ok(())
        }
        Some(Commands::Config) => {
            commands::show_settings(state);
            Ok(())
        }
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => Ok(()),
    };
    result.map(|_| false).map_err(|e| e.to_string())
}
