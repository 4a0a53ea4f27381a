//! Per-campaign phase/loop state machine.
//!
//! A [`RampRun`] walks one [`Campaign`] through *start hold → transition →
//! end hold* for every spec, then loops. Guarded transitions are re-evaluated
//! after every event until none fires, so zero-length phases collapse inside
//! a single call and a late tick can cross several phases at once. Time is
//! sampled once per event by the caller.

use crate::campaign::Campaign;
use crate::interpolate::{Interpolate, interpolate};
use crate::log::trace;
use crate::machine::{RampDevice, ServiceTiming};
use crate::time::{TimeDuration, TimeInstant};
use crate::types::RampSpec;

/// Phase of the active spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampPhase {
    /// Holding the previous state before the transition.
    StartHold,
    /// Interpolating toward the spec's target.
    Ramping,
    /// Holding the target after the transition.
    EndHold,
    /// Choosing the next spec or the next loop.
    SwitchingNextLoop,
    /// Every spec of every loop has run.
    Done,
}

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampPosition {
    /// Index of the spec being executed.
    pub spec_index: usize,
    /// Completed passes through the spec list.
    pub loops_done: u32,
    /// Current phase of that spec.
    pub phase: RampPhase,
}

/// Outcome of feeding one event to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunStatus<D> {
    /// Still running; service again per the timing hint.
    Running(ServiceTiming<D>),
    /// All loops finished during this event.
    Finished,
}

/// Runtime context of one active campaign.
pub(crate) struct RampRun<I: TimeInstant, S, const N: usize> {
    campaign: Campaign<S, I::Duration, N>,
    ramp_idx: usize,
    loop_done: u32,
    phase: RampPhase,
    phase_init_at: I,
    initial_state: Option<S>,
}

impl<I: TimeInstant, S: Interpolate, const N: usize> RampRun<I, S, N> {
    /// Enters the first spec's start hold and settles.
    ///
    /// This is the Entry pseudo-state: counters reset, then StartHold.
    pub(crate) fn start<Dev: RampDevice<S>>(
        campaign: Campaign<S, I::Duration, N>,
        now: I,
        device: &mut Dev,
    ) -> (Self, RunStatus<I::Duration>) {
        let mut run = Self {
            campaign,
            ramp_idx: 0,
            loop_done: 0,
            phase: RampPhase::StartHold,
            phase_init_at: now,
            initial_state: None,
        };
        run.enter_start_hold(now, device);
        let status = run.settle(now, device);
        (run, status)
    }

    /// Handles a tick: updates an in-flight transition, then settles.
    pub(crate) fn tick<Dev: RampDevice<S>>(
        &mut self,
        now: I,
        device: &mut Dev,
    ) -> RunStatus<I::Duration> {
        if self.phase == RampPhase::Ramping {
            self.update_ramp(now, device);
        }
        self.settle(now, device)
    }

    pub(crate) fn position(&self) -> RampPosition {
        RampPosition {
            spec_index: self.ramp_idx,
            loops_done: self.loop_done,
            phase: self.phase,
        }
    }

    pub(crate) fn campaign(&self) -> &Campaign<S, I::Duration, N> {
        &self.campaign
    }

    /// Runs guarded transitions until one does not fire.
    fn settle<Dev: RampDevice<S>>(&mut self, now: I, device: &mut Dev) -> RunStatus<I::Duration> {
        loop {
            let Some(spec) = self.campaign.get_spec(self.ramp_idx) else {
                self.phase = RampPhase::Done;
                return RunStatus::Finished;
            };

            match self.phase {
                RampPhase::StartHold => {
                    let hold = spec.start_hold_duration;
                    if !self.phase_elapsed(now, hold) {
                        return RunStatus::Running(self.remaining(now, hold));
                    }
                    device.on_start_hold(false);
                    self.enter_ramping(now, device);
                }
                RampPhase::Ramping => {
                    let transition = spec.transition_duration;
                    if !self.phase_elapsed(now, transition) {
                        return RunStatus::Running(ServiceTiming::Continuous);
                    }
                    if transition.is_zero() {
                        // Nothing was interpolated; deliver the exact target.
                        device.on_ramp_update(&spec.next_state);
                    }
                    self.enter_end_hold(now, device);
                }
                RampPhase::EndHold => {
                    let hold = spec.end_hold_duration;
                    if !self.phase_elapsed(now, hold) {
                        return RunStatus::Running(self.remaining(now, hold));
                    }
                    device.on_end_hold(false);
                    self.phase = RampPhase::SwitchingNextLoop;
                }
                RampPhase::SwitchingNextLoop => {
                    if self.ramp_idx + 1 < self.campaign.spec_count() {
                        self.ramp_idx += 1;
                    } else if self.campaign.loop_count().has_more(self.loop_done) {
                        self.loop_done = self.loop_done.saturating_add(1);
                        self.ramp_idx = 0;
                        trace!("ramp: loop {} begins", self.loop_done);
                    } else {
                        trace!("ramp: all loops done");
                        self.phase = RampPhase::Done;
                        device.on_all_loops_done();
                        return RunStatus::Finished;
                    }
                    self.enter_start_hold(now, device);
                }
                RampPhase::Done => return RunStatus::Finished,
            }
        }
    }

    fn enter_start_hold<Dev: RampDevice<S>>(&mut self, now: I, device: &mut Dev) {
        trace!("ramp: spec {} start hold", self.ramp_idx);
        self.phase = RampPhase::StartHold;
        self.phase_init_at = now;
        device.on_start_hold(true);
    }

    fn enter_ramping<Dev: RampDevice<S>>(&mut self, now: I, device: &mut Dev) {
        trace!("ramp: spec {} transition", self.ramp_idx);
        self.phase = RampPhase::Ramping;
        self.phase_init_at = now;
        self.initial_state = Some(device.current_state());
    }

    fn enter_end_hold<Dev: RampDevice<S>>(&mut self, now: I, device: &mut Dev) {
        trace!("ramp: spec {} end hold", self.ramp_idx);
        self.phase = RampPhase::EndHold;
        self.phase_init_at = now;
        self.initial_state = None;
        device.on_end_hold(true);
    }

    fn update_ramp<Dev: RampDevice<S>>(&self, now: I, device: &mut Dev) {
        let Some(spec) = self.current_spec() else {
            return;
        };
        let transition_millis = spec.transition_duration.as_millis();
        if transition_millis == 0 {
            return;
        }
        let Some(initial) = self.initial_state.as_ref() else {
            return;
        };

        let elapsed_millis = now.duration_since(self.phase_init_at).as_millis();
        let percent = (elapsed_millis.saturating_mul(100) / transition_millis).min(100) as u8;
        device.on_ramp_update(&interpolate(initial, &spec.next_state, percent));
    }

    fn current_spec(&self) -> Option<&RampSpec<S, I::Duration>> {
        self.campaign.get_spec(self.ramp_idx)
    }

    fn phase_elapsed(&self, now: I, duration: I::Duration) -> bool {
        now.duration_since(self.phase_init_at).as_millis() >= duration.as_millis()
    }

    fn remaining(&self, now: I, duration: I::Duration) -> ServiceTiming<I::Duration> {
        ServiceTiming::Delay(duration.saturating_sub(now.duration_since(self.phase_init_at)))
    }
}
