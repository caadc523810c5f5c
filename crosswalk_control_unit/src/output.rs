//! Signal-head output.
//!
//! Physical heads are driven by lamp code pairs `[vehicle, pedestrian]`
//! (`0 = red`, `1 = green`, `2 = yellow`). [`LampBridge`] wraps a
//! [`SignalOutput`] and forwards a pair only when it differs from the last
//! one written. Output failures are logged and never reach the engine.
//!
//! Bridges read the runner's ordered snapshot stream, so a short amber is
//! written even when the reader wakes up after the following all-red.

use std::io::Write;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{error, info, warn};

use crosswalk_common::signal::snapshot::SignalSnapshot;
use crosswalk_common::signal::state::LampPair;

/// Writing to the signal heads or the snapshot stream failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("lamp driver rejected {codes:?}: {reason}")]
    Rejected { codes: [u8; 2], reason: String },
}

/// Something that can light the two heads.
pub trait SignalOutput {
    fn apply(&mut self, lamps: LampPair) -> Result<(), OutputError>;
}

// ─── Lamp Bridge ────────────────────────────────────────────────────

/// Deduplicating front for a [`SignalOutput`].
#[derive(Debug)]
pub struct LampBridge<O> {
    output: O,
    last: Option<LampPair>,
    writes: u64,
    failures: u64,
}

impl<O: SignalOutput> LampBridge<O> {
    pub const fn new(output: O) -> Self {
        Self {
            output,
            last: None,
            writes: 0,
            failures: 0,
        }
    }

    /// Forward the snapshot's lamps if they changed. Returns `true` if the
    /// output was written.
    ///
    /// A failed write is retried on the next snapshot.
    pub fn publish(&mut self, snapshot: &SignalSnapshot) -> bool {
        if self.last == Some(snapshot.lamps) {
            return false;
        }
        match self.output.apply(snapshot.lamps) {
            Ok(()) => {
                self.last = Some(snapshot.lamps);
                self.writes += 1;
                true
            }
            Err(e) => {
                self.failures += 1;
                warn!(revision = snapshot.revision, "lamp output failed: {e}");
                false
            }
        }
    }

    /// Publish every snapshot already queued on `stream`, oldest first.
    ///
    /// Returns the number of snapshots consumed.
    pub fn drain(&mut self, stream: &mut broadcast::Receiver<SignalSnapshot>) -> usize {
        let mut consumed = 0;
        loop {
            match stream.try_recv() {
                Ok(snapshot) => {
                    self.publish(&snapshot);
                    consumed += 1;
                }
                Err(TryRecvError::Lagged(missed)) => report_lag(missed),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return consumed,
            }
        }
    }

    /// Publish snapshots from `stream` until the runner stops.
    pub async fn follow(&mut self, mut stream: broadcast::Receiver<SignalSnapshot>) {
        loop {
            match stream.recv().await {
                Ok(snapshot) => {
                    self.publish(&snapshot);
                }
                Err(RecvError::Lagged(missed)) => report_lag(missed),
                Err(RecvError::Closed) => break,
            }
        }
    }

    #[inline]
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    #[inline]
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    #[inline]
    pub const fn output(&self) -> &O {
        &self.output
    }
}

/// A stream reader fell behind and lost intermediate lamp states.
pub fn report_lag(missed: u64) {
    error!(missed, "snapshot stream lagged, intermediate states lost");
}

// ─── Outputs ────────────────────────────────────────────────────────

/// Logs every lamp change. Used when no hardware is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingOutput;

impl SignalOutput for TracingOutput {
    fn apply(&mut self, lamps: LampPair) -> Result<(), OutputError> {
        info!(
            vehicle = ?lamps.vehicle,
            pedestrian = ?lamps.pedestrian,
            codes = ?lamps.codes(),
            "lamps"
        );
        Ok(())
    }
}

/// Write one snapshot as a JSON line.
pub fn write_snapshot_line<W: Write>(
    writer: &mut W,
    snapshot: &SignalSnapshot,
) -> Result<(), OutputError> {
    serde_json::to_writer(&mut *writer, snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
