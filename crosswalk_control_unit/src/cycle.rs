//! Tick scheduler: one task owns the supervisor and serializes every event.
//!
//! Ticks come from a fixed-period interval. Other events arrive through a
//! bounded queue held by [`ControllerHandle`]s. Senders wait when the queue
//! is full, so nothing is dropped and arrival order is kept. After each
//! dispatch the invariants are checked and a complete snapshot is published
//! twice: on a `watch` channel holding the latest state, and on a
//! `broadcast` stream that delivers every snapshot in order to lamp drivers
//! and recorders. A stream reader that falls more than
//! [`SNAPSHOT_STREAM_CAPACITY`] snapshots behind is told how many it lost.
//!
//! ## Loop
//!
//! 1. `select!` on shutdown, the next tick and the next queued event.
//! 2. Dispatch the event on the supervisor.
//! 3. Verify invariants. A violation stops the loop without publishing.
//! 4. Publish the snapshot and record statistics.

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crosswalk_common::consts::SNAPSHOT_STREAM_CAPACITY;
use crosswalk_common::signal::command::ControlEvent;
use crosswalk_common::signal::snapshot::SignalSnapshot;

use crate::config::LoadedConfig;
use crate::error::InvariantViolation;
use crate::supervisor::{DispatchReport, Supervisor};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-event statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Tick events processed.
    pub ticks: u64,
    /// All events processed, ticks included.
    pub events: u64,
    /// Dispatches that moved the phase.
    pub phase_changes: u64,
    /// Dispatches that changed the mode.
    pub mode_changes: u64,
    /// Last dispatch duration [ns].
    pub last_latency_ns: u64,
    /// Maximum dispatch duration [ns].
    pub max_latency_ns: u64,
    sum_latency_ns: u128,
}

impl CycleStats {
    #[inline]
    pub fn record(&mut self, report: &DispatchReport, is_tick: bool, latency: Duration) {
        let latency_ns = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.events += 1;
        if is_tick {
            self.ticks += 1;
        }
        if report.phase_changed() {
            self.phase_changes += 1;
        }
        if report.mode_changed() {
            self.mode_changes += 1;
        }
        self.last_latency_ns = latency_ns;
        self.max_latency_ns = self.max_latency_ns.max(latency_ns);
        self.sum_latency_ns += u128::from(latency_ns);
    }

    /// Average dispatch duration [ns] (0 if no events).
    #[inline]
    pub fn avg_latency_ns(&self) -> u64 {
        if self.events == 0 {
            0
        } else {
            u64::try_from(self.sum_latency_ns / u128::from(self.events)).unwrap_or(u64::MAX)
        }
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CycleError {
    /// The runner has stopped; no more events are accepted.
    #[error("controller is not running")]
    Closed,

    /// `try_send` found the queue full.
    #[error("event queue full")]
    QueueFull,

    /// A dispatch left the state inconsistent.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

// ─── Controller Handle ──────────────────────────────────────────────

/// Cloneable front door to a running controller.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    events: mpsc::Sender<ControlEvent>,
    snapshots: watch::Receiver<SignalSnapshot>,
}

impl ControllerHandle {
    /// Queue an event, waiting for room if the queue is full.
    pub async fn send(&self, event: ControlEvent) -> Result<(), CycleError> {
        self.events.send(event).await.map_err(|_| CycleError::Closed)
    }

    /// Queue an event without waiting.
    pub fn try_send(&self, event: ControlEvent) -> Result<(), CycleError> {
        self.events.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => CycleError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => CycleError::Closed,
        })
    }

    /// Queue an event from a non-async thread.
    pub fn blocking_send(&self, event: ControlEvent) -> Result<(), CycleError> {
        self.events
            .blocking_send(event)
            .map_err(|_| CycleError::Closed)
    }

    /// A receiver of the latest snapshot. Intermediate states may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<SignalSnapshot> {
        self.snapshots.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SignalSnapshot {
        *self.snapshots.borrow()
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

pub struct CycleRunner {
    supervisor: Supervisor,
    events: mpsc::Receiver<ControlEvent>,
    snapshots: watch::Sender<SignalSnapshot>,
    stream: broadcast::Sender<SignalSnapshot>,
    tick_period: Duration,
    stats: CycleStats,
}

impl CycleRunner {
    /// Create a runner and the first handle to it.
    ///
    /// `queue_capacity` is raised to 1 if zero.
    pub fn new(
        supervisor: Supervisor,
        tick_period: Duration,
        queue_capacity: usize,
    ) -> (Self, ControllerHandle) {
        let (events_tx, events_rx) = mpsc::channel(queue_capacity.max(1));
        let (snapshots_tx, snapshots_rx) = watch::channel(supervisor.snapshot());
        let (stream_tx, _) = broadcast::channel(SNAPSHOT_STREAM_CAPACITY);

        let runner = Self {
            supervisor,
            events: events_rx,
            snapshots: snapshots_tx,
            stream: stream_tx,
            tick_period,
            stats: CycleStats::default(),
        };
        let handle = ControllerHandle {
            events: events_tx,
            snapshots: snapshots_rx,
        };
        (runner, handle)
    }

    pub fn from_config(config: &LoadedConfig) -> (Self, ControllerHandle) {
        Self::new(
            Supervisor::from_config(config),
            config.controller.tick_period(),
            config.controller.event_queue_capacity,
        )
    }

    #[inline]
    pub const fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    #[inline]
    pub const fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// A receiver of every snapshot published from now on, in order.
    ///
    /// The stream closes when the runner stops.
    pub fn stream(&self) -> broadcast::Receiver<SignalSnapshot> {
        self.stream.subscribe()
    }

    /// Dispatch one event, verify, publish.
    pub fn step(&mut self, event: ControlEvent) -> Result<DispatchReport, CycleError> {
        let started = Instant::now();
        let report = self.supervisor.dispatch(event);

        if let Err(violation) = self.supervisor.check_invariants() {
            error!(%event, %violation, "invariant violated, snapshot withheld");
            return Err(violation.into());
        }

        let snapshot = self.supervisor.snapshot();
        self.snapshots.send_replace(snapshot);
        // No stream readers is not an error.
        let _ = self.stream.send(snapshot);
        self.stats.record(
            &report,
            matches!(event, ControlEvent::Tick),
            started.elapsed(),
        );
        Ok(report)
    }

    /// Run until `shutdown` resolves or every handle is dropped.
    ///
    /// The first tick fires one period after start. Late ticks are
    /// delivered in a burst so none is lost. A zero period runs at 1 ms.
    pub async fn run<F>(mut self, shutdown: F) -> Result<CycleStats, CycleError>
    where
        F: Future<Output = ()>,
    {
        let period = self.tick_period.max(Duration::from_millis(1));
        let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        tokio::pin!(shutdown);

        info!(
            tick_period_ms = u64::try_from(self.tick_period.as_millis()).unwrap_or(u64::MAX),
            mode = ?self.supervisor.state().mode(),
            phase = ?self.supervisor.state().phase(),
            "cycle runner started"
        );

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.step(ControlEvent::Tick)?;
                }
                received = self.events.recv() => match received {
                    Some(event) => {
                        debug!(kind = event.kind(), "event received");
                        self.step(event)?;
                    }
                    None => {
                        info!("all controller handles dropped");
                        break;
                    }
                },
            }
        }

        info!(
            ticks = self.stats.ticks,
            events = self.stats.events,
            phase_changes = self.stats.phase_changes,
            max_latency_ns = self.stats.max_latency_ns,
            "cycle runner stopped"
        );
        Ok(self.stats)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
