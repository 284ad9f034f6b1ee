pub mod app_state;
pub mod commands;
pub mod logging;
pub mod repl;

pub use app_state::{BenchError, BenchState};
pub use repl::readline;
