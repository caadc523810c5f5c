//! Crosswalk Common Library
//!
//! Shared types for the crosswalk workspace: the signal vocabulary (lamps,
//! phases, modes, timers, detection flags), the timing configuration record,
//! the event type consumed by the control unit, and the read-only snapshot
//! published to presentation collaborators.
//!
//! # Module Structure
//!
//! - [`signal`] - Signal enums, timing config, events and snapshots
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - System-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use crosswalk_common::prelude::*;
//!
//! let timing = TimingConfig::default();
//! assert_eq!(timing.car_green_ticks(), 15);
//! assert_eq!(Phase::VehicleGreen.lamps().vehicle, VehicleLight::Green);
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod signal;
