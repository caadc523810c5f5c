//! Phase sequencers.
//!
//! Pure functions from the current phase, detection flags and timing to the
//! next [`Step`]. The Manual cycle ignores detection; the Automatic
//! sequencer has two mirrored variants chosen by green-line preference.

pub mod automatic;
pub mod manual;

use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::state::{LampPair, Phase, Timer, TimerPurpose};

/// The phase a sequencer moves to, together with its fresh timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub timer: Timer,
}

impl Step {
    pub const fn timed(phase: Phase, purpose: TimerPurpose, ticks: u32) -> Self {
        Self {
            phase,
            timer: Timer::finite(purpose, ticks),
        }
    }

    pub const fn hold(phase: Phase, purpose: TimerPurpose) -> Self {
        Self {
            phase,
            timer: Timer::indefinite(purpose),
        }
    }

    #[inline]
    pub const fn lamps(&self) -> LampPair {
        self.phase.lamps()
    }
}

// ─── Timed Entries ──────────────────────────────────────────────────

pub(crate) const fn vehicle_green(timing: &TimingConfig) -> Step {
    Step::timed(
        Phase::VehicleGreen,
        TimerPurpose::Vehicle,
        timing.car_green_ticks(),
    )
}

pub(crate) const fn vehicle_yellow(timing: &TimingConfig) -> Step {
    Step::timed(
        Phase::VehicleYellow,
        TimerPurpose::Yellow,
        timing.yellow_ticks(),
    )
}

pub(crate) const fn pedestrian_green(timing: &TimingConfig) -> Step {
    Step::timed(
        Phase::PedestrianGreen,
        TimerPurpose::Pedestrian,
        timing.ped_green_ticks(),
    )
}

/// `phase` must be one of the all-red buffers.
pub(crate) const fn all_red(phase: Phase, timing: &TimingConfig) -> Step {
    debug_assert!(phase.is_safety_buffer());
    Step::timed(phase, TimerPurpose::AllRed, timing.all_red_safety_ticks())
}
