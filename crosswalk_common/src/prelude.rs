//! Prelude module for common re-exports.
//!
//! `use crosswalk_common::prelude::*;` brings in the signal vocabulary and
//! the configuration traits without listing individual paths.

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::signal::config::{GreenLinePreference, TimingConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{MIN_OVERRIDE_TICKS, MIN_PHASE_TICKS};

// ─── Signal ─────────────────────────────────────────────────────────
pub use crate::signal::command::{
    CommandParseError, ControlEvent, OperatorCommand, OverrideRequest,
};
pub use crate::signal::snapshot::SignalSnapshot;
pub use crate::signal::state::{
    Countdown, DetectionState, LampPair, Mode, PedestrianLight, Phase, Timer, TimerPurpose,
    VehicleLight,
};
