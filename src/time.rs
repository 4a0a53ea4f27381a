//! Time abstraction traits for platform-agnostic timing.
//!
//! The engine never sleeps; it only samples a [`TimeSource`] whenever a
//! request or tick is processed. Plain `u64` tick counters work out of the
//! box, and any `Fn() -> I` closure can act as the source.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

impl<I: TimeInstant, F: Fn() -> I> TimeSource<I> for F {
    fn now(&self) -> I {
        self()
    }
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;

    /// Returns true for a zero-length duration.
    #[inline]
    fn is_zero(&self) -> bool {
        self.as_millis() == 0
    }
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations should saturate to zero if `earlier` is actually later.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}

/// Raw tick counts. One tick is treated as one millisecond.
impl TimeDuration for u64 {
    const ZERO: Self = 0;

    #[inline]
    fn as_millis(&self) -> u64 {
        *self
    }

    #[inline]
    fn from_millis(millis: u64) -> Self {
        millis
    }

    #[inline]
    fn saturating_sub(self, other: Self) -> Self {
        u64::saturating_sub(self, other)
    }
}

/// A raw monotonic tick counter, e.g. a millisecond uptime.
impl TimeInstant for u64 {
    type Duration = u64;

    #[inline]
    fn duration_since(&self, earlier: Self) -> Self::Duration {
        u64::saturating_sub(*self, earlier)
    }
}
