//! Trace logging that compiles away unless the `defmt` feature is enabled.

macro_rules! trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)+);
    };
}

pub(crate) use trace;
