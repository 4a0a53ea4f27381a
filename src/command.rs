//! Command-based control for ramp machines.

use crate::campaign::Campaign;
use crate::time::TimeDuration;
use crate::types::{LoopCount, RampSpec};
use heapless::Vec;

/// Requests accepted by [`RampMachine::handle_action`](crate::RampMachine::handle_action).
#[derive(Debug, Clone)]
pub enum RampAction<S, D: TimeDuration, const N: usize> {
    /// Jump to a state.
    Step(S),
    /// Interpolate to a state over a duration.
    Ramp(S, D),
    /// Jump through states, holding each for a duration.
    Steps(Vec<S, N>, D),
    /// Run specs with a loop count.
    ExecuteSpecs(Vec<RampSpec<S, D>, N>, LoopCount),
    /// Run a prebuilt campaign.
    Execute(Campaign<S, D, N>),
    /// Advance time-based phases.
    Tick,
}

/// Command targeting a specific device.
#[derive(Debug, Clone)]
pub struct RampCommand<Id, S, D: TimeDuration, const N: usize> {
    pub device_id: Id,
    pub action: RampAction<S, D, N>,
}

impl<Id, S, D: TimeDuration, const N: usize> RampCommand<Id, S, D, N> {
    /// Creates command.
    pub fn new(device_id: Id, action: RampAction<S, D, N>) -> Self {
        Self { device_id, action }
    }
}
