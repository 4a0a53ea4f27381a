use crate::interpolate::Interpolate;
use crate::time::TimeDuration;
use crate::types::{LoopCount, RampError, RampSpec};
use heapless::Vec;

/// A validated ramp campaign: ordered specs plus a loop count.
///
/// This is the single canonical request the engine executes. The
/// convenience constructors ([`step`](Self::step), [`ramp`](Self::ramp),
/// [`steps`](Self::steps), [`from_specs`](Self::from_specs)) and the
/// [`CampaignBuilder`] all end up here after validation.
///
/// # Type Parameters
/// * `S` - The state type being ramped
/// * `D` - The duration type (e.g., `embassy_time::Duration`)
/// * `N` - Maximum number of specs this campaign can hold
#[derive(Debug, Clone)]
pub struct Campaign<S, D: TimeDuration, const N: usize> {
    specs: Vec<RampSpec<S, D>, N>,
    loop_count: LoopCount,
}

impl<S: Interpolate, D: TimeDuration, const N: usize> Campaign<S, D, N> {
    /// Creates a new campaign builder.
    pub fn builder() -> CampaignBuilder<S, D, N> {
        CampaignBuilder::new()
    }

    /// Instantly jump to `state`.
    pub fn step(state: S) -> Result<Self, RampError> {
        Self::builder().spec(RampSpec::step(state))?.build()
    }

    /// Interpolate from the current state to `state` over `duration`.
    ///
    /// A zero `duration` behaves like [`step`](Self::step).
    pub fn ramp(state: S, duration: D) -> Result<Self, RampError> {
        Self::builder().spec(RampSpec::ramp(state, duration))?.build()
    }

    /// Jump through `states` in order, holding each for `duration`.
    ///
    /// # Errors
    /// * `ZeroHoldDuration` - `duration` is zero
    /// * `EmptyCampaign` - `states` is empty
    /// * `CapacityExceeded` - more than `N` states
    pub fn steps(states: &[S], duration: D) -> Result<Self, RampError> {
        if duration.is_zero() {
            return Err(RampError::ZeroHoldDuration);
        }

        states
            .iter()
            .try_fold(Self::builder(), |builder, state| {
                builder.spec(RampSpec::held(state.clone(), duration))
            })?
            .build()
    }

    /// Runs `specs` as given, repeated per `loop_count`.
    pub fn from_specs(
        specs: &[RampSpec<S, D>],
        loop_count: impl Into<LoopCount>,
    ) -> Result<Self, RampError> {
        specs
            .iter()
            .try_fold(Self::builder(), |builder, spec| builder.spec(spec.clone()))?
            .loop_count(loop_count.into())
            .build()
    }
}

impl<S, D: TimeDuration, const N: usize> Campaign<S, D, N> {
    /// Returns the number of specs in this campaign.
    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }

    /// Returns the loop count configuration.
    pub fn loop_count(&self) -> LoopCount {
        self.loop_count
    }

    /// Returns a reference to the spec at the given index.
    pub fn get_spec(&self, index: usize) -> Option<&RampSpec<S, D>> {
        self.specs.get(index)
    }

    /// Returns all specs in execution order.
    pub fn specs(&self) -> &[RampSpec<S, D>] {
        &self.specs
    }

    /// Duration of one complete pass through all specs.
    pub fn pass_duration(&self) -> D {
        let total_millis = self
            .specs
            .iter()
            .fold(0u64, |acc, spec| acc.saturating_add(spec.total_millis()));
        D::from_millis(total_millis)
    }
}

/// Builder for constructing validated campaigns.
#[derive(Debug)]
pub struct CampaignBuilder<S, D: TimeDuration, const N: usize> {
    specs: Vec<RampSpec<S, D>, N>,
    loop_count: LoopCount,
}

impl<S: Interpolate, D: TimeDuration, const N: usize> CampaignBuilder<S, D, N> {
    /// Creates a new empty campaign builder.
    pub fn new() -> Self {
        Self {
            specs: Vec::new(),
            loop_count: LoopCount::default(),
        }
    }

    /// Appends a spec to the campaign.
    ///
    /// # Errors
    /// * `CapacityExceeded` - The campaign already holds `N` specs
    pub fn spec(mut self, spec: RampSpec<S, D>) -> Result<Self, RampError> {
        self.specs
            .push(spec)
            .map_err(|_| RampError::CapacityExceeded)?;
        Ok(self)
    }

    /// Sets how many extra passes follow the first one.
    ///
    /// Default is `LoopCount::Finite(0)` (run once).
    pub fn loop_count(mut self, count: impl Into<LoopCount>) -> Self {
        self.loop_count = count.into();
        self
    }

    /// Builds and validates the campaign.
    ///
    /// # Errors
    /// * `EmptyCampaign` - No specs were added
    /// * `NotInterpolable` - A spec has a timed transition but `S` cannot interpolate
    /// * `ZeroLengthInfiniteLoop` - Infinite loop where every duration is zero
    pub fn build(self) -> Result<Campaign<S, D, N>, RampError> {
        if self.specs.is_empty() {
            return Err(RampError::EmptyCampaign);
        }

        if !S::INTERPOLABLE
            && self
                .specs
                .iter()
                .any(|spec| !spec.transition_duration.is_zero())
        {
            return Err(RampError::NotInterpolable);
        }

        if self.loop_count == LoopCount::Infinite
            && self.specs.iter().all(|spec| spec.total_millis() == 0)
        {
            return Err(RampError::ZeroLengthInfiniteLoop);
        }

        Ok(Campaign {
            specs: self.specs,
            loop_count: self.loop_count,
        })
    }
}

impl<S: Interpolate, D: TimeDuration, const N: usize> Default for CampaignBuilder<S, D, N> {
    fn default() -> Self {
        Self::new()
    }
}
