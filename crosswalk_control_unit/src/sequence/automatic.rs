//! Adaptive, detection-driven cycle.
//!
//! The variant is chosen by green-line preference when Automatic mode is
//! entered. The preferred direction idles on an indefinite green until the
//! other direction has demand.
//!
//! ## Vehicle-preferred
//!
//! | Phase                  | Condition               | Next                      |
//! |------------------------|-------------------------|---------------------------|
//! | VehicleGreen (hold)    | pedestrian only         | VehicleYellow             |
//! | VehicleYellow          | expired                 | AllRedSafety1             |
//! | AllRedSafety1          | expired                 | PedestrianGreen           |
//! | PedestrianGreen        | expired, pedestrian only| PedestrianGreen (extend)  |
//! | PedestrianGreen        | expired, otherwise      | AllRedSafety2             |
//! | AllRedSafety2          | expired, pedestrian only| PedestrianGreen           |
//! | AllRedSafety2          | expired, otherwise      | VehicleGreen (hold)       |
//!
//! ## Pedestrian-preferred
//!
//! Any vehicle presence interrupts the pedestrian hold, even with pedestrians
//! still present. The vehicle-preferred hold only yields to pedestrians when
//! no vehicle is present.
//!
//! | Phase                  | Condition               | Next                      |
//! |------------------------|-------------------------|---------------------------|
//! | PedestrianGreen (hold) | vehicle present         | AllRedSafety1             |
//! | AllRedSafety1          | expired                 | VehicleGreen              |
//! | VehicleGreen           | expired, vehicle present| VehicleGreen (extend)     |
//! | VehicleGreen           | expired, pedestrian only| AllRedSafety2             |
//! | VehicleGreen           | expired, nobody         | VehicleYellow             |
//! | VehicleYellow          | expired                 | AllRedSafety2             |
//! | AllRedSafety2          | expired                 | PedestrianGreen (hold)    |

use crosswalk_common::signal::config::{GreenLinePreference, TimingConfig};
use crosswalk_common::signal::state::{Countdown, DetectionState, Phase, TimerPurpose};

use super::{Step, all_red, pedestrian_green, vehicle_green, vehicle_yellow};

const VEHICLE_HOLD: Step = Step::hold(Phase::VehicleGreen, TimerPurpose::Vehicle);
const PEDESTRIAN_HOLD: Step = Step::hold(Phase::PedestrianGreen, TimerPurpose::Pedestrian);

/// Phase entered when Automatic mode starts.
pub const fn entry(variant: GreenLinePreference) -> Step {
    match variant {
        GreenLinePreference::Vehicle => VEHICLE_HOLD,
        GreenLinePreference::Pedestrian => PEDESTRIAN_HOLD,
    }
}

/// Evaluate the sequencer for the current phase.
///
/// Called when the timer has expired or is indefinite. Returns `None` when
/// an indefinite hold has no competing demand. Every expired phase yields a
/// step.
pub fn advance(
    variant: GreenLinePreference,
    phase: Phase,
    remaining: Countdown,
    detection: DetectionState,
    timing: &TimingConfig,
) -> Option<Step> {
    match variant {
        GreenLinePreference::Vehicle => advance_vehicle_preferred(phase, remaining, detection, timing),
        GreenLinePreference::Pedestrian => {
            advance_pedestrian_preferred(phase, remaining, detection, timing)
        }
    }
}

fn advance_vehicle_preferred(
    phase: Phase,
    remaining: Countdown,
    detection: DetectionState,
    timing: &TimingConfig,
) -> Option<Step> {
    let step = match phase {
        Phase::VehicleGreen if detection.pedestrian_only() => vehicle_yellow(timing),
        Phase::VehicleGreen if remaining.is_indefinite() => return None,
        Phase::VehicleGreen => VEHICLE_HOLD,
        Phase::VehicleYellow => all_red(Phase::AllRedSafety1, timing),
        Phase::AllRedSafety1 => pedestrian_green(timing),
        Phase::PedestrianGreen if detection.pedestrian_only() => pedestrian_green(timing),
        Phase::PedestrianGreen | Phase::PedestrianStop => all_red(Phase::AllRedSafety2, timing),
        Phase::AllRedSafety2 if detection.pedestrian_only() => pedestrian_green(timing),
        Phase::AllRedSafety2 => VEHICLE_HOLD,
    };
    Some(step)
}

fn advance_pedestrian_preferred(
    phase: Phase,
    remaining: Countdown,
    detection: DetectionState,
    timing: &TimingConfig,
) -> Option<Step> {
    let step = match phase {
        Phase::PedestrianGreen if detection.vehicle_present => {
            all_red(Phase::AllRedSafety1, timing)
        }
        Phase::PedestrianGreen if remaining.is_indefinite() => return None,
        Phase::PedestrianGreen => PEDESTRIAN_HOLD,
        Phase::AllRedSafety1 => vehicle_green(timing),
        Phase::VehicleGreen if detection.vehicle_present => vehicle_green(timing),
        Phase::VehicleGreen if detection.pedestrian_present => {
            all_red(Phase::AllRedSafety2, timing)
        }
        Phase::VehicleGreen => vehicle_yellow(timing),
        Phase::VehicleYellow | Phase::PedestrianStop => all_red(Phase::AllRedSafety2, timing),
        Phase::AllRedSafety2 => PEDESTRIAN_HOLD,
    };
    Some(step)
}

// ─── Tests ──────────────────────────────────────────────────────────
