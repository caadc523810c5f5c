//! Fatal engine errors.
//!
//! Transition functions are total, so the only engine error is a broken
//! state invariant. It is a programming error: the scheduler logs it and
//! aborts instead of publishing the snapshot.

use thiserror::Error;

use crosswalk_common::signal::state::{LampPair, Mode, Phase};

/// A state invariant does not hold after a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Both heads show Green.
    #[error("conflicting greens: vehicle={:?} pedestrian={:?}", .0.vehicle, .0.pedestrian)]
    ConflictingGreens(LampPair),

    /// Outside Override the lamps must be the ones fixed by the phase.
    #[error("lamps {lamps:?} do not match phase {phase:?} in {mode:?}")]
    LampsDisagreeWithPhase {
        mode: Mode,
        phase: Phase,
        lamps: LampPair,
    },

    /// A finite countdown was left at zero instead of advancing.
    #[error("expired timer left in phase {phase:?} ({mode:?})")]
    StalledTimer { mode: Mode, phase: Phase },
}

// ─── Tests ──────────────────────────────────────────────────────────
