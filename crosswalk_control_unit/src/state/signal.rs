//! The `SignalState` aggregate and its invariants.

use crosswalk_common::signal::config::{GreenLinePreference, TimingConfig};
use crosswalk_common::signal::snapshot::SignalSnapshot;
use crosswalk_common::signal::state::{
    DetectionState, LampPair, Mode, Phase, Timer, TimerPurpose,
};

use crate::error::InvariantViolation;
use crate::sequence::{Step, automatic, manual};

/// Complete state of one intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalState {
    pub(crate) mode: Mode,
    pub(crate) previous_mode: Option<Mode>,
    pub(crate) phase: Phase,
    pub(crate) lamps: LampPair,
    pub(crate) timer: Timer,
    pub(crate) detection: DetectionState,
    pub(crate) timing: TimingConfig,
    /// Automatic variant latched at the last Automatic entry.
    pub(crate) automatic_variant: GreenLinePreference,
}

impl SignalState {
    /// Start-up state: `initial_mode` entered with no previous mode.
    pub fn new(timing: TimingConfig, initial_mode: Mode) -> Self {
        let mut state = Self {
            mode: initial_mode,
            previous_mode: None,
            phase: Phase::default(),
            lamps: LampPair::ALL_RED,
            timer: Timer::indefinite(TimerPurpose::Vehicle),
            detection: DetectionState::NONE,
            timing,
            automatic_variant: timing.green_line_preference,
        };
        state.enter_mode(initial_mode);
        state
    }

    // ── Accessors ──

    #[inline]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub const fn previous_mode(&self) -> Option<Mode> {
        self.previous_mode
    }

    #[inline]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub const fn lamps(&self) -> LampPair {
        self.lamps
    }

    #[inline]
    pub const fn timer(&self) -> Timer {
        self.timer
    }

    #[inline]
    pub const fn detection(&self) -> DetectionState {
        self.detection
    }

    #[inline]
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[inline]
    pub const fn automatic_variant(&self) -> GreenLinePreference {
        self.automatic_variant
    }

    // ── Mutation (supervisor only) ──

    /// Reset phase, lamps and timer for `mode`. Leaves `previous_mode` alone.
    ///
    /// Entering Automatic latches the variant and clears detection. Entering
    /// Override directly holds both heads Red until the next mode change.
    pub(crate) fn enter_mode(&mut self, mode: Mode) {
        self.mode = mode;
        match mode {
            Mode::Manual => self.enter_step(manual::entry(&self.timing)),
            Mode::Automatic => {
                self.automatic_variant = self.timing.green_line_preference;
                self.detection = DetectionState::NONE;
                self.enter_step(automatic::entry(self.automatic_variant));
            }
            Mode::Override => {
                self.phase = Phase::AllRedSafety1;
                self.lamps = LampPair::ALL_RED;
                self.timer = Timer::indefinite(TimerPurpose::Override);
            }
        }
    }

    /// Move to `step`, taking the lamps fixed by its phase.
    #[inline]
    pub(crate) fn enter_step(&mut self, step: Step) {
        self.phase = step.phase;
        self.lamps = step.lamps();
        self.timer = step.timer;
    }

    // ── Invariants ──

    /// Check the invariants every observable state must satisfy.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if !self.lamps.is_exclusive() {
            return Err(InvariantViolation::ConflictingGreens(self.lamps));
        }
        if self.mode != Mode::Override && self.lamps != self.phase.lamps() {
            return Err(InvariantViolation::LampsDisagreeWithPhase {
                mode: self.mode,
                phase: self.phase,
                lamps: self.lamps,
            });
        }
        if self.timer.remaining.is_expired() {
            return Err(InvariantViolation::StalledTimer {
                mode: self.mode,
                phase: self.phase,
            });
        }
        Ok(())
    }

    pub fn snapshot(&self, revision: u64, tick: u64) -> SignalSnapshot {
        SignalSnapshot {
            revision,
            tick,
            mode: self.mode,
            previous_mode: self.previous_mode,
            phase: self.phase,
            lamps: self.lamps,
            timer: self.timer,
            detection: self.detection,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
