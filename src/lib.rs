#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`RampSpec`**: One target state with start-hold, transition and end-hold durations
//! - **`Campaign`**: A validated, ordered list of specs plus a `LoopCount`
//! - **`LoopCount`**: Extra passes after the first (`Finite(n)`) or `Infinite`
//! - **`RampMachine`**: Drives a single device through campaigns, one at a time
//! - **`RampDevice`**: Trait to implement for the thing being ramped
//! - **`Interpolate`**: How a state type blends between two values
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`RampPosition`**: Spec index, loop and phase of the running campaign
//! - **`RampAction`**: Requests that can be sent to a task owning a machine
//!
//! Integers and floats interpolate linearly, arrays and `Srgb` colors
//! channel-wise. `bool` and `()` are discrete: they can be stepped and held
//! but not ramped.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

mod log;

pub mod time;
pub mod types;
pub mod interpolate;
pub mod campaign;
pub mod run;
pub mod machine;
pub mod command;

pub use campaign::{Campaign, CampaignBuilder};
pub use command::{RampAction, RampCommand};
pub use interpolate::{Interpolate, interpolate};
pub use machine::{MachineState, RampDevice, RampMachine, ServiceTiming};
pub use run::{RampPhase, RampPosition};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use types::{LoopCount, RampError, RampSpec};
