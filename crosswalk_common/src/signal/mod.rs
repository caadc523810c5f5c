//! Signal-controller shared types.
//!
//! Everything exchanged between the control unit and its collaborators lives
//! here: lamp and phase enums, the timing configuration, inbound events and
//! the outbound snapshot.

pub mod command;
pub mod config;
pub mod snapshot;
pub mod state;
