//! Interpolation between two states of the same type.
//!
//! Numeric types interpolate linearly, compound types field-wise. Types
//! without a meaningful midpoint set [`Interpolate::INTERPOLABLE`] to
//! `false`; campaigns that would need them to interpolate are rejected when
//! they are built, so the engine never asks.

use palette::{Mix, Srgb};

/// Computes an intermediate state during a transition.
pub trait Interpolate: Clone {
    /// Whether values of this type can be blended at all.
    const INTERPOLABLE: bool = true;

    /// Returns the state `percent` of the way from `init` to `target`.
    ///
    /// `percent` is already clamped to `0..=100`. Implementations for
    /// non-interpolable types are never called with anything other than
    /// settled states and may simply return `target`.
    fn interpolate(init: &Self, target: &Self, percent: u8) -> Self;
}

/// Interpolates with `percent` clamped to `0..=100`.
#[inline]
pub fn interpolate<S: Interpolate>(init: &S, target: &S, percent: u8) -> S {
    S::interpolate(init, target, percent.min(100))
}

macro_rules! impl_linear_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl Interpolate for $t {
                #[inline]
                fn interpolate(init: &Self, target: &Self, percent: u8) -> Self {
                    let init = *init as i128;
                    let delta = *target as i128 - init;
                    // |delta * percent / 100| <= |delta|, so the result stays in range.
                    (init + delta * percent as i128 / 100) as $t
                }
            }
        )*
    };
}

impl_linear_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Interpolate for f32 {
    #[inline]
    fn interpolate(init: &Self, target: &Self, percent: u8) -> Self {
        init + (target - init) * f32::from(percent) / 100.0
    }
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(init: &Self, target: &Self, percent: u8) -> Self {
        init + (target - init) * f64::from(percent) / 100.0
    }
}

/// Channel-wise linear blend in the sRGB encoding.
impl Interpolate for Srgb {
    #[inline]
    fn interpolate(init: &Self, target: &Self, percent: u8) -> Self {
        init.mix(*target, f32::from(percent) / 100.0)
    }
}

impl<T: Interpolate, const K: usize> Interpolate for [T; K] {
    const INTERPOLABLE: bool = T::INTERPOLABLE;

    #[inline]
    fn interpolate(init: &Self, target: &Self, percent: u8) -> Self {
        core::array::from_fn(|i| T::interpolate(&init[i], &target[i], percent))
    }
}

impl Interpolate for bool {
    const INTERPOLABLE: bool = false;

    #[inline]
    fn interpolate(_init: &Self, target: &Self, _percent: u8) -> Self {
        *target
    }
}

impl Interpolate for () {
    const INTERPOLABLE: bool = false;

    #[inline]
    fn interpolate(_init: &Self, _target: &Self, _percent: u8) -> Self {}
}
