//! Timing configuration for one intersection.
//!
//! Deserialized from the `[timing]` TOML table. Durations are stored exactly
//! as supplied (signed, so out-of-range values survive parsing) and read
//! through `*_ticks()` accessors which clamp to [`MIN_PHASE_TICKS`].
//! Omitted fields fall back to the product defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_ALL_RED_SAFETY, DEFAULT_CAR_GREEN, DEFAULT_PED_GREEN, DEFAULT_YELLOW, MIN_PHASE_TICKS,
};

/// Which direction idles on an indefinite green when there is no demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GreenLinePreference {
    #[default]
    #[serde(alias = "Car", alias = "vehicle", alias = "car")]
    Vehicle,
    #[serde(alias = "Ped", alias = "pedestrian", alias = "ped")]
    Pedestrian,
}

/// Phase durations and green-line preference [ticks].
///
/// # TOML Example
///
/// ```toml
/// [timing]
/// car_green = 15
/// ped_green = 10
/// yellow = 3
/// all_red_safety = 2
/// green_line_preference = "Vehicle"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    /// Vehicle green hold.
    #[serde(default = "default_car_green")]
    pub car_green: i64,
    /// Pedestrian green hold.
    #[serde(default = "default_ped_green")]
    pub ped_green: i64,
    /// Vehicle amber hold.
    #[serde(default = "default_yellow")]
    pub yellow: i64,
    /// All-red buffer between conflicting greens.
    #[serde(default = "default_all_red_safety")]
    pub all_red_safety: i64,
    #[serde(default)]
    pub green_line_preference: GreenLinePreference,
}

fn default_car_green() -> i64 {
    DEFAULT_CAR_GREEN
}
fn default_ped_green() -> i64 {
    DEFAULT_PED_GREEN
}
fn default_yellow() -> i64 {
    DEFAULT_YELLOW
}
fn default_all_red_safety() -> i64 {
    DEFAULT_ALL_RED_SAFETY
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            car_green: DEFAULT_CAR_GREEN,
            ped_green: DEFAULT_PED_GREEN,
            yellow: DEFAULT_YELLOW,
            all_red_safety: DEFAULT_ALL_RED_SAFETY,
            green_line_preference: GreenLinePreference::Vehicle,
        }
    }
}

/// Clamp a raw duration into `[MIN_PHASE_TICKS, u32::MAX]`.
#[inline]
pub const fn clamp_ticks(raw: i64) -> u32 {
    if raw < MIN_PHASE_TICKS as i64 {
        MIN_PHASE_TICKS
    } else if raw > u32::MAX as i64 {
        u32::MAX
    } else {
        raw as u32
    }
}

impl TimingConfig {
    pub const fn new(
        car_green: i64,
        ped_green: i64,
        yellow: i64,
        all_red_safety: i64,
        green_line_preference: GreenLinePreference,
    ) -> Self {
        Self {
            car_green,
            ped_green,
            yellow,
            all_red_safety,
            green_line_preference,
        }
    }

    #[inline]
    pub const fn car_green_ticks(&self) -> u32 {
        clamp_ticks(self.car_green)
    }

    #[inline]
    pub const fn ped_green_ticks(&self) -> u32 {
        clamp_ticks(self.ped_green)
    }

    #[inline]
    pub const fn yellow_ticks(&self) -> u32 {
        clamp_ticks(self.yellow)
    }

    #[inline]
    pub const fn all_red_safety_ticks(&self) -> u32 {
        clamp_ticks(self.all_red_safety)
    }

    /// Names of duration fields whose raw value is below the floor.
    pub fn clamped_fields(&self) -> Vec<&'static str> {
        [
            ("car_green", self.car_green),
            ("ped_green", self.ped_green),
            ("yellow", self.yellow),
            ("all_red_safety", self.all_red_safety),
        ]
        .into_iter()
        .filter(|&(_, raw)| raw < MIN_PHASE_TICKS as i64)
        .map(|(name, _)| name)
        .collect()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
