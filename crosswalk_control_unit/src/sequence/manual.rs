//! Fixed-timing cycle.
//!
//! `VehicleGreen → VehicleYellow → AllRedSafety1 → PedestrianGreen →
//! AllRedSafety2 → VehicleGreen`, each phase held for its configured
//! duration. Detection flags are never consulted.

use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::state::Phase;

use super::{Step, all_red, pedestrian_green, vehicle_green, vehicle_yellow};

/// Phase entered when Manual mode starts.
#[inline]
pub const fn entry(timing: &TimingConfig) -> Step {
    vehicle_green(timing)
}

/// Successor of `phase` once its timer has expired.
pub const fn next(phase: Phase, timing: &TimingConfig) -> Step {
    match phase {
        Phase::VehicleGreen => vehicle_yellow(timing),
        Phase::VehicleYellow => all_red(Phase::AllRedSafety1, timing),
        Phase::AllRedSafety1 => pedestrian_green(timing),
        Phase::PedestrianGreen | Phase::PedestrianStop => all_red(Phase::AllRedSafety2, timing),
        Phase::AllRedSafety2 => vehicle_green(timing),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
