//! Logging setup for the bench binaries.
//!
//! Stdout only. `RUST_LOG` wins when set; otherwise `DEBUG_LOGGING=1` turns
//! on debug output for the multitimer crates and everything else stays at
//! info.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,multitimer=debug,multitimer_core=debug";

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
    });

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    // A second init (tests, embedding) keeps the first subscriber.
    if tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        return;
    }

    tracing::debug!(debug_logging, "multitimer logging initialized");
}
