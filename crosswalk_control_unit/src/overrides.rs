//! Forced colour changes.
//!
//! An override sets one head to a requested colour and derives the other
//! head from mutual exclusion. The hold length follows the colour that ends
//! up green (or the amber time for a vehicle yellow) and never drops below
//! [`MIN_OVERRIDE_TICKS`].

use crosswalk_common::consts::MIN_OVERRIDE_TICKS;
use crosswalk_common::signal::command::OverrideRequest;
use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::state::{
    LampPair, Mode, PedestrianLight, Timer, TimerPurpose, VehicleLight,
};

/// Lamps and timer installed by an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedHold {
    pub lamps: LampPair,
    pub timer: Timer,
}

/// Compute the lamp pair and hold for `request`.
pub const fn forced_hold(request: OverrideRequest, timing: &TimingConfig) -> ForcedHold {
    let (lamps, ticks) = match request {
        OverrideRequest::Vehicle(VehicleLight::Green) => (
            LampPair::new(VehicleLight::Green, PedestrianLight::Red),
            timing.car_green_ticks(),
        ),
        OverrideRequest::Vehicle(VehicleLight::Yellow) => (
            LampPair::new(VehicleLight::Yellow, PedestrianLight::Red),
            timing.yellow_ticks(),
        ),
        OverrideRequest::Vehicle(VehicleLight::Red) => (
            LampPair::new(VehicleLight::Red, PedestrianLight::Green),
            timing.ped_green_ticks(),
        ),
        OverrideRequest::Pedestrian(PedestrianLight::Green) => (
            LampPair::new(VehicleLight::Red, PedestrianLight::Green),
            timing.ped_green_ticks(),
        ),
        OverrideRequest::Pedestrian(PedestrianLight::Red) => (
            LampPair::new(VehicleLight::Green, PedestrianLight::Red),
            timing.car_green_ticks(),
        ),
    };

    ForcedHold {
        lamps,
        timer: Timer::finite(TimerPurpose::Override, floor(ticks)),
    }
}

#[inline]
const fn floor(ticks: u32) -> u32 {
    if ticks < MIN_OVERRIDE_TICKS {
        MIN_OVERRIDE_TICKS
    } else {
        ticks
    }
}

/// Mode resumed when an override expires.
///
/// Override never resumes into itself; a missing record resumes Automatic.
#[inline]
pub const fn resume_mode(previous: Option<Mode>) -> Mode {
    match previous {
        Some(Mode::Manual) => Mode::Manual,
        _ => Mode::Automatic,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
