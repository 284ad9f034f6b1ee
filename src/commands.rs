use std::io::Write;
use std::path::Path;

use multitimer_core::{Tick, Timer, TimerKind};

use crate::app_state::{BenchError, BenchState, Edge};

pub fn add_timer(
    state: &mut BenchState,
    name: &str,
    kind: TimerKind,
    preset: Tick,
    on_time: Option<Tick>,
) -> Result<(), BenchError> {
    let timer = Timer::with_on_time(kind, preset, on_time.unwrap_or(0));
    let id = state.add(name, timer)?;
    println!("added {} timer '{}' ({}) preset {}ms", kind, name, id, preset);
    Ok(())
}

pub fn load(state: &mut BenchState, path: Option<&str>) -> Result<(), BenchError> {
    let count = state.load(path.map(Path::new))?;
    println!("joined {} timers", count);
    Ok(())
}

pub fn remove_timer(state: &mut BenchState, name: &str) -> Result<(), BenchError> {
    let timer = state.remove(name)?;
    println!("removed '{}' (count was {}ms)", name, timer.count());
    Ok(())
}

pub fn set_inputs(
    state: &mut BenchState,
    name: &str,
    enable: Option<bool>,
    reset: Option<bool>,
    control: Option<bool>,
) -> Result<(), BenchError> {
    let timer = state.timer_mut(name)?;
    if let Some(enable) = enable {
        timer.set_enable(enable);
    }
    if let Some(reset) = reset {
        timer.set_reset(reset);
    }
    if let Some(control) = control {
        if !timer.kind().uses_control() {
            println!("note: {} timers ignore the control input", timer.kind());
        }
        timer.set_control(control);
    }
    Ok(())
}

pub fn start(state: &mut BenchState, name: &str) -> Result<(), BenchError> {
    let timer = state.timer_mut(name)?;
    if timer.kind() != TimerKind::Latched {
        println!("note: start only affects latched timers");
    }
    timer.start(true);
    Ok(())
}

pub fn set_on_time(state: &mut BenchState, name: &str, ms: Tick) -> Result<(), BenchError> {
    let timer = state.timer_mut(name)?;
    if !timer.kind().has_on_time() {
        println!("note: {} timers have no on-time", timer.kind());
    }
    timer.set_on_time(ms);
    Ok(())
}

pub fn step(state: &mut BenchState, cycles: Option<u32>, ticks: Option<Tick>) {
    let cycles = cycles.unwrap_or(1);
    let ticks = ticks.unwrap_or(state.config.tick_step_ms);

    for event in state.step(cycles, ticks) {
        let arrow = match event.edge {
            Edge::Rose => "rose",
            Edge::Fell => "fell",
        };
        println!(
            "[cycle {:>5} @ {:>8}ms] {:<20} done {}",
            event.cycle, event.tick, event.name, arrow
        );
    }
    println!("cycle {} at {}ms", state.cycle(), state.clock_now());
}

pub fn show(state: &BenchState) {
    if state.registry().is_empty() {
        println!("No timers");
        return;
    }

    println!(
        "{:<20} {:<16} {:>8} {:>8}  {:<3} {:<3} {:<3} {:<4} {:<4} {}",
        "Name", "Kind", "Preset", "Count", "EN", "RES", "CTL", "DONE", "RUN", "Flash"
    );
    println!("{}", "-".repeat(90));

    for (id, timer) in state.registry() {
        let name = state.name_of(id).unwrap_or("?");
        let flash = match timer.on_time() {
            Some(on_time) => format!("{} (on {}ms)", flag(timer.is_flashing()), on_time),
            None => "-".to_string(),
        };
        println!(
            "{:<20} {:<16} {:>8} {:>8}  {:<3} {:<3} {:<3} {:<4} {:<4} {}",
            name,
            timer.kind().as_str(),
            timer.preset(),
            timer.count(),
            flag(timer.is_enabled()),
            flag(timer.is_reset()),
            flag(timer.is_control()),
            flag(timer.is_done()),
            flag(timer.is_running()),
            flash
        );
    }

    println!("\nTotal: {} timers", state.registry().len());
}

pub fn show_settings(state: &BenchState) {
    match BenchState::config_path() {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: <unavailable>"),
    }
    println!("tick_step_ms: {}", state.config.tick_step_ms);
    println!("log_teardown: {}", state.config.log_teardown);
    println!(
        "definitions_dir: {}",
        state.config.definitions_dir.as_deref().unwrap_or("<none>")
    );
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
