//! Teardown hooks
//!
//! A registry can carry one observer that sees every timer as it leaves,
//! just before the timer is handed back to the caller (or dropped).

use tracing::info;

use super::{Timer, TimerId};

/// Notified when a timer leaves a `TimerRegistry`.
pub trait TeardownObserver {
    fn on_teardown(&mut self, id: TimerId, timer: &Timer);
}

impl<F> TeardownObserver for F
where
    F: FnMut(TimerId, &Timer),
{
    fn on_teardown(&mut self, id: TimerId, timer: &Timer) {
        self(id, timer)
    }
}

/// Logs one line per destroyed timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTeardown;

impl TeardownObserver for LogTeardown {
    fn on_teardown(&mut self, id: TimerId, timer: &Timer) {
        info!(
            timer = %id,
            kind = timer.kind().as_str(),
            count = timer.count(),
            "one {} timer destroyed",
            timer.kind()
        );
    }
}
