//! Live controller state.
//!
//! The [`signal::SignalState`] aggregate has a single writer, the
//! [`Supervisor`](crate::supervisor::Supervisor).

pub mod signal;
