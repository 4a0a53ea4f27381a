//! Core types for campaign construction.

use crate::time::TimeDuration;

/// One target state with its three phase durations.
///
/// A spec is executed as *start hold → transition → end hold*. A zero
/// duration skips that phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampSpec<S, D: TimeDuration> {
    /// State to reach at the end of the transition.
    pub next_state: S,

    /// Time to hold the previous state before transitioning.
    pub start_hold_duration: D,

    /// Time over which the state is interpolated toward `next_state`.
    pub transition_duration: D,

    /// Time to hold `next_state` after the transition.
    pub end_hold_duration: D,
}

impl<S, D: TimeDuration> RampSpec<S, D> {
    /// Creates a new ramp spec.
    #[inline]
    pub fn new(next_state: S, start_hold: D, transition: D, end_hold: D) -> Self {
        Self {
            next_state,
            start_hold_duration: start_hold,
            transition_duration: transition,
            end_hold_duration: end_hold,
        }
    }

    /// Instantly jump to `state`.
    #[inline]
    pub fn step(state: S) -> Self {
        Self::new(state, D::ZERO, D::ZERO, D::ZERO)
    }

    /// Interpolate toward `state` over `duration`.
    #[inline]
    pub fn ramp(state: S, duration: D) -> Self {
        Self::new(state, D::ZERO, duration, D::ZERO)
    }

    /// Jump to `state` and hold it for `duration`.
    #[inline]
    pub fn held(state: S, duration: D) -> Self {
        Self::new(state, D::ZERO, D::ZERO, duration)
    }

    /// Sum of all three phase durations in milliseconds.
    #[inline]
    pub fn total_millis(&self) -> u64 {
        self.start_hold_duration
            .as_millis()
            .saturating_add(self.transition_duration.as_millis())
            .saturating_add(self.end_hold_duration.as_millis())
    }
}

/// How many times a campaign repeats after its first pass.
///
/// `Finite(n)` runs the spec sequence `n + 1` times in total, so
/// `Finite(0)` runs it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopCount {
    /// Repeat a specific number of additional times.
    Finite(u32),

    /// Repeat indefinitely.
    Infinite,
}

impl LoopCount {
    /// Returns true if another pass should follow after `loops_done` repeats.
    #[inline]
    pub fn has_more(self, loops_done: u32) -> bool {
        match self {
            LoopCount::Finite(count) => loops_done < count,
            LoopCount::Infinite => true,
        }
    }

    /// Total number of passes, or `None` when infinite.
    #[inline]
    pub fn total_passes(self) -> Option<u64> {
        match self {
            LoopCount::Finite(count) => Some(u64::from(count) + 1),
            LoopCount::Infinite => None,
        }
    }
}

impl Default for LoopCount {
    fn default() -> Self {
        LoopCount::Finite(0)
    }
}

/// Signed repeat count: negative means infinite.
impl From<i32> for LoopCount {
    fn from(count: i32) -> Self {
        match u32::try_from(count) {
            Ok(count) => LoopCount::Finite(count),
            Err(_) => LoopCount::Infinite,
        }
    }
}

/// Request validation errors.
///
/// All of these are reported before the engine is touched, so a rejected
/// request leaves any running campaign as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampError {
    /// No specs or states provided.
    EmptyCampaign,

    /// A held step sequence was requested with a zero hold duration.
    ZeroHoldDuration,

    /// Non-zero transition requested for a state type that cannot be interpolated.
    NotInterpolable,

    /// Infinite loop over specs whose durations are all zero.
    ZeroLengthInfiniteLoop,

    /// Campaign capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for RampError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RampError::EmptyCampaign => {
                write!(f, "campaign must have at least one spec")
            }
            RampError::ZeroHoldDuration => {
                write!(f, "held steps require a non-zero duration")
            }
            RampError::NotInterpolable => {
                write!(
                    f,
                    "state type cannot be interpolated (transitions must have zero duration)"
                )
            }
            RampError::ZeroLengthInfiniteLoop => {
                write!(f, "infinite loop over zero-duration specs would never yield")
            }
            RampError::CapacityExceeded => {
                write!(f, "campaign capacity exceeded")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RampError {}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::format;

    #[test]
    fn signed_loop_counts_map_negative_to_infinite() {
        assert_eq!(LoopCount::from(-1), LoopCount::Infinite);
        assert_eq!(LoopCount::from(i32::MIN), LoopCount::Infinite);
        assert_eq!(LoopCount::from(0), LoopCount::Finite(0));
        assert_eq!(LoopCount::from(3), LoopCount::Finite(3));
    }

    #[test]
    fn finite_loop_count_is_additional_passes() {
        let once = LoopCount::default();
        assert!(!once.has_more(0));
        assert_eq!(once.total_passes(), Some(1));

        let thrice = LoopCount::Finite(2);
        assert!(thrice.has_more(0));
        assert!(thrice.has_more(1));
        assert!(!thrice.has_more(2));
        assert_eq!(thrice.total_passes(), Some(3));

        assert!(LoopCount::Infinite.has_more(u32::MAX));
        assert_eq!(LoopCount::Infinite.total_passes(), None);
    }

    #[test]
    fn spec_constructors_place_durations() {
        let spec = RampSpec::<u8, u64>::held(7, 250);
        assert_eq!(spec.start_hold_duration, 0);
        assert_eq!(spec.transition_duration, 0);
        assert_eq!(spec.end_hold_duration, 250);

        let spec = RampSpec::<u8, u64>::ramp(7, 1000);
        assert_eq!(spec.transition_duration, 1000);
        assert_eq!(spec.total_millis(), 1000);

        assert_eq!(RampSpec::<u8, u64>::new(1, 10, 20, 30).total_millis(), 60);
    }

    #[test]
    fn error_messages_format_correctly_for_display() {
        assert!(format!("{}", RampError::EmptyCampaign).contains("at least one spec"));
        assert!(format!("{}", RampError::ZeroHoldDuration).contains("non-zero"));
        assert!(format!("{}", RampError::NotInterpolable).contains("interpolated"));
        assert!(format!("{}", RampError::CapacityExceeded).contains("capacity"));
    }
}
