//! State enums for the signal controller.
//!
//! Lamp enums use `#[repr(u8)]` with discriminants equal to the lamp codes
//! the hardware bridge expects (`0 = red`, `1 = green`, `2 = yellow`).

use serde::{Deserialize, Serialize};

// ─── Lamps ──────────────────────────────────────────────────────────

/// Vehicle signal head colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VehicleLight {
    Red = 0,
    Green = 1,
    Yellow = 2,
}

impl VehicleLight {
    /// Convert from a raw lamp code. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Red),
            1 => Some(Self::Green),
            2 => Some(Self::Yellow),
            _ => None,
        }
    }

    #[inline]
    pub const fn lamp_code(self) -> u8 {
        self as u8
    }
}

impl Default for VehicleLight {
    fn default() -> Self {
        Self::Red
    }
}

/// Pedestrian signal head colour. Pedestrian heads have no amber lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PedestrianLight {
    Red = 0,
    Green = 1,
}

impl PedestrianLight {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Red),
            1 => Some(Self::Green),
            _ => None,
        }
    }

    #[inline]
    pub const fn lamp_code(self) -> u8 {
        self as u8
    }
}

impl Default for PedestrianLight {
    fn default() -> Self {
        Self::Red
    }
}

/// The colour pair shown by both heads at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LampPair {
    pub vehicle: VehicleLight,
    pub pedestrian: PedestrianLight,
}

impl LampPair {
    /// Both heads Red.
    pub const ALL_RED: Self = Self::new(VehicleLight::Red, PedestrianLight::Red);

    pub const fn new(vehicle: VehicleLight, pedestrian: PedestrianLight) -> Self {
        Self {
            vehicle,
            pedestrian,
        }
    }

    /// Mutual exclusion: the heads never show Green together.
    #[inline]
    pub const fn is_exclusive(&self) -> bool {
        !(matches!(self.vehicle, VehicleLight::Green)
            && matches!(self.pedestrian, PedestrianLight::Green))
    }

    #[inline]
    pub const fn is_all_red(&self) -> bool {
        matches!(self.vehicle, VehicleLight::Red) && matches!(self.pedestrian, PedestrianLight::Red)
    }

    /// Lamp codes ordered `[vehicle, pedestrian]`.
    #[inline]
    pub const fn codes(&self) -> [u8; 2] {
        [self.vehicle.lamp_code(), self.pedestrian.lamp_code()]
    }
}

// ─── Phase ──────────────────────────────────────────────────────────

/// One discrete step of the signal cycle.
///
/// Each phase fixes the lamp pair shown while it is held (see [`Phase::lamps`]).
/// `PedestrianStop` is not produced by any current phase graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    VehicleGreen = 0,
    VehicleYellow = 1,
    AllRedSafety1 = 2,
    PedestrianGreen = 3,
    PedestrianStop = 4,
    AllRedSafety2 = 5,
}

impl Phase {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::VehicleGreen),
            1 => Some(Self::VehicleYellow),
            2 => Some(Self::AllRedSafety1),
            3 => Some(Self::PedestrianGreen),
            4 => Some(Self::PedestrianStop),
            5 => Some(Self::AllRedSafety2),
            _ => None,
        }
    }

    /// Lamp pair fixed by phase identity.
    pub const fn lamps(self) -> LampPair {
        match self {
            Self::VehicleGreen => LampPair::new(VehicleLight::Green, PedestrianLight::Red),
            Self::VehicleYellow => LampPair::new(VehicleLight::Yellow, PedestrianLight::Red),
            Self::PedestrianGreen => LampPair::new(VehicleLight::Red, PedestrianLight::Green),
            Self::AllRedSafety1 | Self::AllRedSafety2 | Self::PedestrianStop => LampPair::ALL_RED,
        }
    }

    /// True for the all-red safety buffers.
    #[inline]
    pub const fn is_safety_buffer(self) -> bool {
        matches!(self, Self::AllRedSafety1 | Self::AllRedSafety2)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::VehicleGreen
    }
}

// ─── Mode ───────────────────────────────────────────────────────────

/// Top-level operating regime. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    /// Adaptive, detection-driven cycle.
    Automatic = 0,
    /// Fixed-timing cycle, ignores detection.
    Manual = 1,
    /// Temporary forced colour; resumes the previous mode on expiry.
    Override = 2,
}

impl Mode {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Automatic),
            1 => Some(Self::Manual),
            2 => Some(Self::Override),
            _ => None,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Automatic
    }
}

// ─── Timer ──────────────────────────────────────────────────────────

/// What the running countdown is timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimerPurpose {
    Vehicle = 0,
    Pedestrian = 1,
    Yellow = 2,
    AllRed = 3,
    Override = 4,
}

/// Remaining hold of the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Countdown {
    /// Ticks left before the phase expires.
    Finite(u32),
    /// Hold until an external condition fires.
    Indefinite,
}

impl Countdown {
    #[inline]
    pub const fn is_expired(self) -> bool {
        matches!(self, Self::Finite(0))
    }

    #[inline]
    pub const fn is_indefinite(self) -> bool {
        matches!(self, Self::Indefinite)
    }

    /// Finite remaining ticks, `None` while indefinite.
    #[inline]
    pub const fn remaining(self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Indefinite => None,
        }
    }
}

/// A tagged countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timer {
    pub purpose: TimerPurpose,
    pub remaining: Countdown,
}

impl Timer {
    pub const fn finite(purpose: TimerPurpose, ticks: u32) -> Self {
        Self {
            purpose,
            remaining: Countdown::Finite(ticks),
        }
    }

    pub const fn indefinite(purpose: TimerPurpose) -> Self {
        Self {
            purpose,
            remaining: Countdown::Indefinite,
        }
    }

    /// One tick elapsed. Returns `true` if the countdown moved.
    ///
    /// Expired and indefinite timers are left untouched.
    #[inline]
    pub fn decrement(&mut self) -> bool {
        match self.remaining {
            Countdown::Finite(n) if n > 0 => {
                self.remaining = Countdown::Finite(n - 1);
                true
            }
            _ => false,
        }
    }
}

// ─── Detection ──────────────────────────────────────────────────────

/// Most recent presence snapshot from the vision collaborator.
///
/// Overwrite-only: the controller never increments or decrements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DetectionState {
    pub vehicle_present: bool,
    pub pedestrian_present: bool,
}

impl DetectionState {
    /// Nothing detected.
    pub const NONE: Self = Self::new(false, false);

    pub const fn new(vehicle_present: bool, pedestrian_present: bool) -> Self {
        Self {
            vehicle_present,
            pedestrian_present,
        }
    }

    /// Pedestrian demand with no competing vehicle.
    #[inline]
    pub const fn pedestrian_only(&self) -> bool {
        self.pedestrian_present && !self.vehicle_present
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
