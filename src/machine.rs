//! Ramp engine with request handling and timing control.
//!
//! Provides [`RampMachine`] which drives a single device through timed ramp
//! campaigns, and the [`RampDevice`] trait the device implements to expose
//! its state and receive notifications.

use crate::campaign::Campaign;
use crate::command::RampAction;
use crate::interpolate::Interpolate;
use crate::log::trace;
use crate::run::{RampPosition, RampRun, RunStatus};
use crate::time::{TimeInstant, TimeSource};
use crate::types::{LoopCount, RampError, RampSpec};

/// Trait for the device being ramped.
///
/// Only [`current_state`](Self::current_state) is required; every hook has
/// a no-op default. The engine never stores the state itself, so
/// implementations normally apply the value passed to
/// [`on_ramp_update`](Self::on_ramp_update) and report it back from
/// `current_state`.
pub trait RampDevice<S> {
    /// Returns the device's current state, used as the interpolation origin.
    fn current_state(&self) -> S;

    /// A new (interpolated or final) state should be applied.
    fn on_ramp_update(&mut self, _state: &S) {}

    /// A campaign was accepted. `restart` is true if it superseded a running one.
    fn on_ramp_start(&mut self, _restart: bool) {}

    /// Start hold phase begins (`true`) or ends (`false`).
    fn on_start_hold(&mut self, _begin: bool) {}

    /// End hold phase begins (`true`) or ends (`false`).
    fn on_end_hold(&mut self, _begin: bool) {}

    /// The campaign ran every spec of every loop.
    fn on_all_loops_done(&mut self) {}

    /// The campaign ended, either by completing or by being superseded.
    fn on_stopped(&mut self) {}
}

/// The current state of a ramp machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineState {
    /// No campaign running.
    Idle,
    /// A campaign is executing.
    Ramping,
}

/// Timing information returned by requests and ticks.
///
/// Indicates when the machine needs to be ticked again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming<D> {
    /// Transition in progress. Tick again at your desired update rate.
    Continuous,

    /// Holding a state. Tick again after the specified delay.
    Delay(D),

    /// No campaign running. No ticking needed until the next request.
    Complete,
}

/// Drives one device through timed ramp campaigns.
///
/// Requests ([`step`](Self::step), [`ramp`](Self::ramp),
/// [`steps`](Self::steps), [`execute_specs`](Self::execute_specs),
/// [`execute`](Self::execute)) replace whatever campaign is running. Call
/// [`tick`](Self::tick) periodically to advance time-based phases.
///
/// All mutators take `&mut self`; share an engine between tasks by
/// serializing access externally.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `S` - State type being ramped
/// * `Dev` - Device implementation type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of specs in a campaign
pub struct RampMachine<'t, I, S, Dev, T, const N: usize>
where
    I: TimeInstant,
    S: Interpolate,
    Dev: RampDevice<S>,
    T: TimeSource<I>,
{
    device: Dev,
    time_source: &'t T,
    run: Option<RampRun<I, S, N>>,
}

impl<'t, I, S, Dev, T, const N: usize> RampMachine<'t, I, S, Dev, T, N>
where
    I: TimeInstant,
    S: Interpolate,
    Dev: RampDevice<S>,
    T: TimeSource<I>,
{
    /// Creates a new idle machine. The device is not touched.
    pub fn new(device: Dev, time_source: &'t T) -> Self {
        Self {
            device,
            time_source,
            run: None,
        }
    }

    /// Handles an action by dispatching to the appropriate method.
    ///
    /// Convenience for command-based control, e.g. actions received over a
    /// channel by the task that owns the machine.
    pub fn handle_action(
        &mut self,
        action: RampAction<S, I::Duration, N>,
    ) -> Result<ServiceTiming<I::Duration>, RampError> {
        match action {
            RampAction::Step(state) => self.step(state),
            RampAction::Ramp(state, duration) => self.ramp(state, duration),
            RampAction::Steps(states, duration) => self.steps(&states, duration),
            RampAction::ExecuteSpecs(specs, loop_count) => self.execute_specs(&specs, loop_count),
            RampAction::Execute(campaign) => Ok(self.execute(campaign)),
            RampAction::Tick => Ok(self.tick()),
        }
    }

    /// Jumps to `state` immediately.
    ///
    /// The update is delivered before this returns and the machine ends
    /// up `Idle` again.
    pub fn step(&mut self, state: S) -> Result<ServiceTiming<I::Duration>, RampError> {
        Ok(self.execute(Campaign::step(state)?))
    }

    /// Interpolates from the device's current state to `state` over `duration`.
    ///
    /// # Errors
    /// * `NotInterpolable` - `duration` is non-zero and `S` cannot interpolate
    pub fn ramp(
        &mut self,
        state: S,
        duration: I::Duration,
    ) -> Result<ServiceTiming<I::Duration>, RampError> {
        Ok(self.execute(Campaign::ramp(state, duration)?))
    }

    /// Jumps through `states` in order, holding each for `duration`.
    ///
    /// # Errors
    /// * `ZeroHoldDuration` - `duration` is zero
    /// * `EmptyCampaign` - `states` is empty
    /// * `CapacityExceeded` - more than `N` states
    pub fn steps(
        &mut self,
        states: &[S],
        duration: I::Duration,
    ) -> Result<ServiceTiming<I::Duration>, RampError> {
        Ok(self.execute(Campaign::steps(states, duration)?))
    }

    /// Runs `specs` as given, repeated per `loop_count`.
    ///
    /// A negative `i32` loop count means infinite; `k >= 0` runs `k + 1` passes.
    ///
    /// # Errors
    /// Any validation error from [`CampaignBuilder::build`](crate::CampaignBuilder::build).
    pub fn execute_specs(
        &mut self,
        specs: &[RampSpec<S, I::Duration>],
        loop_count: impl Into<LoopCount>,
    ) -> Result<ServiceTiming<I::Duration>, RampError> {
        Ok(self.execute(Campaign::from_specs(specs, loop_count)?))
    }

    /// Starts `campaign`, superseding any running one.
    ///
    /// A superseded campaign gets `on_stopped` but never `on_all_loops_done`.
    pub fn execute(&mut self, campaign: Campaign<S, I::Duration, N>) -> ServiceTiming<I::Duration> {
        let now = self.time_source.now();
        let restart = self.run.take().is_some();
        if restart {
            trace!("ramp: superseding running campaign");
            self.device.on_stopped();
        }

        trace!("ramp: start, {} specs, restart={}", campaign.spec_count(), restart);
        self.device.on_ramp_start(restart);

        let (run, status) = RampRun::start(campaign, now, &mut self.device);
        self.run = Some(run);
        self.apply(status)
    }

    /// Advances time-based phases. Call this periodically.
    ///
    /// Ignored while `Idle`.
    pub fn tick(&mut self) -> ServiceTiming<I::Duration> {
        let Some(run) = self.run.as_mut() else {
            return ServiceTiming::Complete;
        };

        let now = self.time_source.now();
        let status = run.tick(now, &mut self.device);
        self.apply(status)
    }

    fn apply(&mut self, status: RunStatus<I::Duration>) -> ServiceTiming<I::Duration> {
        match status {
            RunStatus::Running(timing) => timing,
            RunStatus::Finished => {
                trace!("ramp: stopped");
                self.run = None;
                self.device.on_stopped();
                ServiceTiming::Complete
            }
        }
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> MachineState {
        if self.run.is_some() {
            MachineState::Ramping
        } else {
            MachineState::Idle
        }
    }

    /// Returns true if a campaign is running.
    pub fn is_ramping(&self) -> bool {
        self.run.is_some()
    }

    /// Returns the position within the running campaign, if any.
    pub fn position(&self) -> Option<RampPosition> {
        self.run.as_ref().map(RampRun::position)
    }

    /// Returns a reference to the running campaign, if any.
    pub fn current_campaign(&self) -> Option<&Campaign<S, I::Duration, N>> {
        self.run.as_ref().map(RampRun::campaign)
    }

    /// Returns a reference to the device.
    pub fn device(&self) -> &Dev {
        &self.device
    }

    /// Returns a mutable reference to the device.
    ///
    /// Changing the device's state mid-transition does not affect the
    /// interpolation origin, which is captured when the transition begins.
    pub fn device_mut(&mut self) -> &mut Dev {
        &mut self.device
    }

    /// Consumes the machine and returns the device.
    pub fn into_device(self) -> Dev {
        self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    extern crate std;
    use std::vec::Vec;

    struct Level {
        value: u8,
        starts: Vec<bool>,
        stops: usize,
    }

    impl Level {
        fn new() -> Self {
            Self {
                value: 0,
                starts: Vec::new(),
                stops: 0,
            }
        }
    }

    impl RampDevice<u8> for Level {
        fn current_state(&self) -> u8 {
            self.value
        }

        fn on_ramp_update(&mut self, state: &u8) {
            self.value = *state;
        }

        fn on_ramp_start(&mut self, restart: bool) {
            self.starts.push(restart);
        }

        fn on_stopped(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let clock = Cell::new(0u64);
        let now = || clock.get();
        let mut machine = RampMachine::<u64, u8, Level, _, 4>::new(Level::new(), &now);

        assert_eq!(machine.tick(), ServiceTiming::Complete);
        assert_eq!(machine.state(), MachineState::Idle);
        assert!(machine.position().is_none());
        assert!(machine.device().starts.is_empty());
    }

    #[test]
    fn rejected_request_leaves_running_campaign_untouched() {
        let clock = Cell::new(0u64);
        let now = || clock.get();
        let mut machine = RampMachine::<u64, u8, Level, _, 4>::new(Level::new(), &now);

        machine.ramp(200, 1000).unwrap();
        assert!(machine.is_ramping());

        assert_eq!(machine.steps(&[], 100), Err(RampError::EmptyCampaign));
        assert_eq!(machine.steps(&[1, 2], 0), Err(RampError::ZeroHoldDuration));
        assert_eq!(machine.execute_specs(&[], 0), Err(RampError::EmptyCampaign));

        assert!(machine.is_ramping());
        assert_eq!(machine.device().starts, [false]);
        assert_eq!(machine.device().stops, 0);

        clock.set(500);
        machine.tick();
        assert_eq!(machine.device().value, 100);
    }

    #[test]
    fn supersede_reports_stop_then_restart() {
        let clock = Cell::new(0u64);
        let now = || clock.get();
        let mut machine = RampMachine::<u64, u8, Level, _, 4>::new(Level::new(), &now);

        machine.ramp(100, 1000).unwrap();
        machine.ramp(50, 1000).unwrap();

        assert_eq!(machine.device().starts, [false, true]);
        assert_eq!(machine.device().stops, 1);
        assert_eq!(machine.current_campaign().unwrap().get_spec(0).unwrap().next_state, 50);
    }

    #[test]
    fn handle_action_dispatches_requests_and_ticks() {
        let clock = Cell::new(0u64);
        let now = || clock.get();
        let mut machine = RampMachine::<u64, u8, Level, _, 4>::new(Level::new(), &now);

        let timing = machine.handle_action(RampAction::Step(9)).unwrap();
        assert_eq!(timing, ServiceTiming::Complete);
        assert_eq!(machine.device().value, 9);

        let timing = machine.handle_action(RampAction::Ramp(19, 100)).unwrap();
        assert_eq!(timing, ServiceTiming::Continuous);

        clock.set(100);
        let timing = machine.handle_action(RampAction::Tick).unwrap();
        assert_eq!(timing, ServiceTiming::Complete);
        assert_eq!(machine.device().value, 19);
    }
}
