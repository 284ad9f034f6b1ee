//! Per-kind reset policies
//!
//! Every timer kind shares the accumulate / clear / edge / running sequence in
//! `Timer::update` and differs only in when it clears. `Behavior` is the
//! closed set of kinds, carrying whatever private state a policy needs.
//!
//! Off-delay also answers `should_clear`, but its caller is the inverted
//! update path rather than the shared one.

use multitimer_types::TimerKind;

use super::edge::OneShot;
use crate::clock::Tick;

/// Caller-driven inputs, as seen by a reset policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inputs {
    pub enable: bool,
    pub reset: bool,
    pub control: bool,
}

/// Timer outputs from the current scan, as seen by a reset policy.
///
/// `done_rose` is the pulse produced on the previous scan: policies run
/// before this scan's edges are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outputs {
    pub done: bool,
    pub done_rose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Behavior {
    OnDelay,
    OffDelay,
    Retentive,
    PulseGenerator,
    Latched,
    Retriggerable {
        /// Edge latches on the control input
        control: OneShot,
    },
    Flasher {
        /// Span at the start of each cycle during which the flash output is on
        on_time: Tick,
    },
}

impl Behavior {
    pub(crate) fn new(kind: TimerKind, on_time: Tick) -> Self {
        match kind {
            TimerKind::OnDelay => Behavior::OnDelay,
            TimerKind::OffDelay => Behavior::OffDelay,
            TimerKind::Retentive => Behavior::Retentive,
            TimerKind::PulseGenerator => Behavior::PulseGenerator,
            TimerKind::Latched => Behavior::Latched,
            TimerKind::Retriggerable => Behavior::Retriggerable {
                control: OneShot::armed_for(false),
            },
            TimerKind::Flasher => Behavior::Flasher { on_time },
        }
    }

    pub(crate) fn kind(&self) -> TimerKind {
        match self {
            Behavior::OnDelay => TimerKind::OnDelay,
            Behavior::OffDelay => TimerKind::OffDelay,
            Behavior::Retentive => TimerKind::Retentive,
            Behavior::PulseGenerator => TimerKind::PulseGenerator,
            Behavior::Latched => TimerKind::Latched,
            Behavior::Retriggerable { .. } => TimerKind::Retriggerable,
            Behavior::Flasher { .. } => TimerKind::Flasher,
        }
    }

    /// Decide whether the timer clears this scan.
    ///
    /// Takes `&mut self` because the retriggerable policy samples its control
    /// latches here, once per scan, whether or not it ends up clearing.
    pub(crate) fn should_clear(&mut self, inputs: Inputs, outputs: Outputs) -> bool {
        match self {
            Behavior::OnDelay => inputs.reset || !inputs.enable,
            Behavior::OffDelay => inputs.reset || inputs.enable,
            Behavior::Retentive => inputs.reset,
            Behavior::PulseGenerator => inputs.reset || outputs.done_rose,
            Behavior::Latched => inputs.reset && outputs.done,
            Behavior::Retriggerable { control } => {
                control.sample(inputs.control);
                inputs.reset || control.changed()
            }
            Behavior::Flasher { .. } => !inputs.enable || outputs.done_rose,
        }
    }
}
