//! Shared test infrastructure for ramp-machine integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use ramp_machine::{RampDevice, TimeSource};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement (raw `u64` ticks)
pub struct MockTimeSource {
    current_time: core::cell::Cell<u64>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(0),
        }
    }

    /// Advance time by the given number of ticks
    pub fn advance(&self, ticks: u64) {
        self.current_time.set(self.current_time.get() + ticks);
    }

    pub fn set_time(&self, time: u64) {
        self.current_time.set(time);
    }
}

impl TimeSource<u64> for MockTimeSource {
    fn now(&self) -> u64 {
        self.current_time.get()
    }
}

// ============================================================================
// Recording Device
// ============================================================================

/// Every notification a device can receive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<S> {
    Update(S),
    RampStart { restart: bool },
    StartHold { begin: bool },
    EndHold { begin: bool },
    AllLoopsDone,
    Stopped,
}

/// Mock device that applies updates and records every hook call
pub struct RecordingDevice<S> {
    state: S,
    events: heapless::Vec<Event<S>, 256>,
}

impl<S: Clone> RecordingDevice<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            events: heapless::Vec::new(),
        }
    }

    pub fn state(&self) -> S {
        self.state.clone()
    }

    pub fn events(&self) -> &[Event<S>] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Values passed to `on_ramp_update`, in order
    pub fn updates(&self) -> std::vec::Vec<S> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Update(state) => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Event<S>) -> usize
    where
        S: PartialEq,
    {
        self.events.iter().filter(|event| *event == wanted).count()
    }

    fn record(&mut self, event: Event<S>) {
        let _ = self.events.push(event);
    }
}

impl<S: Clone> RampDevice<S> for RecordingDevice<S> {
    fn current_state(&self) -> S {
        self.state.clone()
    }

    fn on_ramp_update(&mut self, state: &S) {
        self.state = state.clone();
        self.record(Event::Update(state.clone()));
    }

    fn on_ramp_start(&mut self, restart: bool) {
        self.record(Event::RampStart { restart });
    }

    fn on_start_hold(&mut self, begin: bool) {
        self.record(Event::StartHold { begin });
    }

    fn on_end_hold(&mut self, begin: bool) {
        self.record(Event::EndHold { begin });
    }

    fn on_all_loops_done(&mut self) {
        self.record(Event::AllLoopsDone);
    }

    fn on_stopped(&mut self) {
        self.record(Event::Stopped);
    }
}
