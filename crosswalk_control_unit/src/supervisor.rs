//! Mode supervisor: the single writer of [`SignalState`].
//!
//! [`Supervisor::dispatch`] applies exactly one [`ControlEvent`] and never
//! advances more than one phase. It is synchronous and does no I/O besides
//! logging, so scenarios can be replayed without a clock.
//!
//! ## Event handling
//!
//! | Event                | Effect                                                  |
//! |----------------------|---------------------------------------------------------|
//! | Tick                 | count down; on expiry advance the active mode's cycle   |
//! | DetectionUpdate      | overwrite flags; re-evaluate an Automatic indefinite hold|
//! | ClearDetections      | reset flags, no transition                              |
//! | SetMode              | re-enter the mode, remember the mode it replaced        |
//! | RequestOverride      | force a colour, remember the mode to resume             |
//! | UpdateConfiguration  | replace timing, no transition                           |

use tracing::{debug, info};

use crosswalk_common::signal::command::{ControlEvent, OverrideRequest};
use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::snapshot::SignalSnapshot;
use crosswalk_common::signal::state::{Countdown, DetectionState, Mode, Phase};

use crate::config::{LoadedConfig, warn_clamped};
use crate::error::InvariantViolation;
use crate::overrides::{forced_hold, resume_mode};
use crate::sequence::{automatic, manual};
use crate::state::signal::SignalState;

// ─── Dispatch Report ────────────────────────────────────────────────

/// What one dispatch changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub mode_before: Mode,
    pub mode_after: Mode,
    pub phase_before: Phase,
    pub phase_after: Phase,
    pub lamps_changed: bool,
}

impl DispatchReport {
    #[inline]
    pub fn mode_changed(&self) -> bool {
        self.mode_before != self.mode_after
    }

    #[inline]
    pub fn phase_changed(&self) -> bool {
        self.phase_before != self.phase_after
    }
}

// ─── Supervisor ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Supervisor {
    state: SignalState,
    revision: u64,
    ticks: u64,
}

impl Supervisor {
    pub fn new(timing: TimingConfig, initial_mode: Mode) -> Self {
        Self {
            state: SignalState::new(timing, initial_mode),
            revision: 0,
            ticks: 0,
        }
    }

    pub fn from_config(config: &LoadedConfig) -> Self {
        Self::new(config.timing, config.controller.initial_mode)
    }

    #[inline]
    pub const fn state(&self) -> &SignalState {
        &self.state
    }

    /// Events processed so far.
    #[inline]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Ticks processed so far.
    #[inline]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn snapshot(&self) -> SignalSnapshot {
        self.state.snapshot(self.revision, self.ticks)
    }

    #[inline]
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.state.check_invariants()
    }

    /// Apply one event.
    pub fn dispatch(&mut self, event: ControlEvent) -> DispatchReport {
        let mode_before = self.state.mode;
        let phase_before = self.state.phase;
        let lamps_before = self.state.lamps;

        match event {
            ControlEvent::Tick => self.on_tick(),
            ControlEvent::DetectionUpdate(detection) => self.on_detection(detection),
            ControlEvent::ClearDetections => self.state.detection = DetectionState::NONE,
            ControlEvent::SetMode(mode) => self.on_set_mode(mode),
            ControlEvent::RequestOverride(request) => self.on_override(request),
            ControlEvent::UpdateConfiguration(timing) => self.on_update_configuration(timing),
        }
        self.revision += 1;

        debug_assert!(
            self.state.check_invariants().is_ok(),
            "invariant broken after {event}: {:?}",
            self.state.check_invariants()
        );

        let report = DispatchReport {
            mode_before,
            mode_after: self.state.mode,
            phase_before,
            phase_after: self.state.phase,
            lamps_changed: lamps_before != self.state.lamps,
        };
        if report.phase_changed() {
            debug!(
                mode = ?self.state.mode,
                from = ?phase_before,
                to = ?self.state.phase,
                timer = ?self.state.timer.remaining,
                "phase advanced"
            );
        }
        report
    }

    // ── Handlers ──

    fn on_tick(&mut self) {
        self.ticks += 1;
        match self.state.timer.remaining {
            Countdown::Finite(_) => {
                self.state.timer.decrement();
                if self.state.timer.remaining.is_expired() {
                    self.on_expiry();
                }
            }
            Countdown::Indefinite => {
                if self.state.mode == Mode::Automatic {
                    self.advance_automatic();
                }
            }
        }
    }

    fn on_expiry(&mut self) {
        match self.state.mode {
            Mode::Override => {
                let resume = resume_mode(self.state.previous_mode);
                info!(resume = ?resume, "override expired");
                self.state.enter_mode(resume);
            }
            Mode::Manual => {
                let step = manual::next(self.state.phase, &self.state.timing);
                self.state.enter_step(step);
            }
            Mode::Automatic => {
                self.advance_automatic();
            }
        }
    }

    fn advance_automatic(&mut self) {
        let state = &self.state;
        if let Some(step) = automatic::advance(
            state.automatic_variant,
            state.phase,
            state.timer.remaining,
            state.detection,
            &state.timing,
        ) {
            self.state.enter_step(step);
        }
    }

    fn on_detection(&mut self, detection: DetectionState) {
        self.state.detection = detection;
        if self.state.mode == Mode::Automatic && self.state.timer.remaining.is_indefinite() {
            self.advance_automatic();
        }
    }

    fn on_set_mode(&mut self, mode: Mode) {
        let before = self.state.mode;
        if mode != Mode::Override {
            self.state.previous_mode = Some(before);
        }
        self.state.enter_mode(mode);
        info!(from = ?before, to = ?mode, phase = ?self.state.phase, "mode set");
    }

    fn on_override(&mut self, request: OverrideRequest) {
        let hold = forced_hold(request, &self.state.timing);
        if self.state.mode != Mode::Override {
            self.state.previous_mode = Some(self.state.mode);
        }
        self.state.mode = Mode::Override;
        self.state.lamps = hold.lamps;
        self.state.timer = hold.timer;
        info!(
            request = ?request,
            lamps = ?hold.lamps.codes(),
            ticks = ?hold.timer.remaining.remaining(),
            resume = ?self.state.previous_mode,
            "override engaged"
        );
    }

    fn on_update_configuration(&mut self, timing: TimingConfig) {
        warn_clamped(&timing);
        self.state.timing = timing;
        info!(?timing, "timing updated");
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
