//! # Crosswalk Control Unit Library
//!
//! Signal-phase engine for one intersection with a vehicle head and a
//! pedestrian head. Once per tick it decides which colour each head shows,
//! how long that colour holds and when to advance.
//!
//! ## Layers
//!
//! 1. **Sequencers** ([`sequence`]): pure phase graphs for Manual and
//!    Automatic mode
//! 2. **Overrides** ([`overrides`]): forced colour with a floored hold
//! 3. **Supervisor** ([`supervisor`]): applies one event at a time to the
//!    single [`state::signal::SignalState`]
//! 4. **Scheduler** ([`cycle`]): tokio task that serializes ticks and
//!    queued events and publishes snapshots
//! 5. **Output** ([`output`]): lamp code bridge and JSON snapshot lines
//!
//! ## Invariants
//!
//! Vehicle and pedestrian heads are never Green together, conflicting
//! greens are always separated by an all-red buffer, and no phase has a
//! zero hold.

pub mod config;
pub mod cycle;
pub mod error;
pub mod output;
pub mod overrides;
pub mod sequence;
pub mod state;
pub mod supervisor;
