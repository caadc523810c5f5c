//! Read-only view of the controller published after every event.
//!
//! Presentation collaborators (dashboards, the lamp bridge) only ever see a
//! [`SignalSnapshot`]. It is plain data, `Copy`, and serializes to one JSON
//! object per event.

use serde::{Deserialize, Serialize};

use super::state::{DetectionState, LampPair, Mode, Phase, Timer};

/// Controller state at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    /// Incremented once per processed event.
    pub revision: u64,
    /// Ticks processed since start-up.
    pub tick: u64,
    pub mode: Mode,
    /// Mode to resume when an override expires.
    pub previous_mode: Option<Mode>,
    pub phase: Phase,
    pub lamps: LampPair,
    pub timer: Timer,
    pub detection: DetectionState,
}

impl SignalSnapshot {
    /// Lamp codes ordered `[vehicle, pedestrian]`.
    #[inline]
    pub const fn lamp_codes(&self) -> [u8; 2] {
        self.lamps.codes()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
