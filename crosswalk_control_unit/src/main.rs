//! # Crosswalk Control Unit
//!
//! Loads `config/controller.toml`, starts the tick scheduler and drives the
//! signal heads until Ctrl-C.
//!
//! Operator commands are read line by line from stdin (`tick`,
//! `detect 0 1`, `clear`, `mode manual`, `override vehicle red`, `reload`).
//! `--emit-snapshots` streams every published snapshot as a JSON line on
//! stdout for a presentation collaborator.

use std::io::BufRead;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crosswalk_common::config::LogLevel;
use crosswalk_common::consts::DEFAULT_CONFIG_PATH;
use crosswalk_common::signal::command::{ControlEvent, OperatorCommand};
use crosswalk_common::signal::snapshot::SignalSnapshot;
use crosswalk_control_unit::config::{LoadedConfig, load_config, reload_timing};
use crosswalk_control_unit::cycle::{ControllerHandle, CycleRunner};
use crosswalk_control_unit::output::{
    LampBridge, TracingOutput, report_lag, write_snapshot_line,
};

/// Crosswalk Control Unit: signal-phase engine for one intersection
#[derive(Parser, Debug)]
#[command(name = "crosswalk_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Adaptive traffic and pedestrian signal controller")]
struct Args {
    /// Path to the controller configuration TOML.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Write every snapshot to stdout as a JSON line.
    #[arg(long)]
    emit_snapshots: bool,

    /// Do not read operator commands from stdin.
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let loaded = load_config(&args.config);

    let configured = loaded
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, configured);

    info!(
        "Crosswalk Control Unit v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let result = match loaded {
        Ok(config) => run(&args, config).await,
        Err(e) => Err(format!("{}: {e}", args.config.display()).into()),
    };
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Crosswalk Control Unit shutdown complete");
}

async fn run(args: &Args, config: LoadedConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        service = %config.shared.service_name,
        tick_period_ms = config.controller.tick_period_ms,
        queue = config.controller.event_queue_capacity,
        mode = ?config.controller.initial_mode,
        preference = ?config.timing.green_line_preference,
        "Config OK"
    );

    let (runner, handle) = CycleRunner::from_config(&config);
    let initial = handle.snapshot();
    let lamps = tokio::spawn(drive_lamps(runner.stream(), initial));
    let emitter = if args.emit_snapshots {
        Some(spawn_snapshot_writer(runner.stream(), initial)?)
    } else {
        None
    };

    if !args.no_console {
        spawn_operator_console(handle.clone(), args.config.clone(), config)?;
    }

    let stats = runner.run(shutdown_signal()).await?;
    info!(
        ticks = stats.ticks,
        events = stats.events,
        phase_changes = stats.phase_changes,
        avg_latency_ns = stats.avg_latency_ns(),
        max_latency_ns = stats.max_latency_ns,
        "final revision {}",
        handle.snapshot().revision
    );

    drop(handle);
    lamps.await?;
    if let Some(emitter) = emitter {
        if emitter.join().is_err() {
            warn!("snapshot writer panicked");
        }
    }
    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

/// Feed every lamp change to the head driver, in order.
///
/// Ends when the runner stops publishing.
async fn drive_lamps(stream: broadcast::Receiver<SignalSnapshot>, initial: SignalSnapshot) {
    let mut bridge = LampBridge::new(TracingOutput);
    bridge.publish(&initial);
    bridge.follow(stream).await;
    debug!(
        writes = bridge.writes(),
        failures = bridge.failures(),
        "lamp driver stopped"
    );
}

/// Write every snapshot to stdout as a JSON line on a dedicated thread.
fn spawn_snapshot_writer(
    mut stream: broadcast::Receiver<SignalSnapshot>,
    initial: SignalSnapshot,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("snapshot-writer".to_string())
        .spawn(move || {
            let stdout = std::io::stdout();
            let mut next = Some(initial);
            loop {
                if let Some(snapshot) = next.take() {
                    if let Err(e) = write_snapshot_line(&mut stdout.lock(), &snapshot) {
                        warn!("snapshot stream failed: {e}");
                        break;
                    }
                }
                match stream.blocking_recv() {
                    Ok(snapshot) => next = Some(snapshot),
                    Err(RecvError::Lagged(missed)) => report_lag(missed),
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("snapshot writer stopped");
        })
}

/// Read operator lines from stdin on a dedicated thread.
///
/// Unparseable lines are logged and skipped. `reload` re-reads the `[timing]`
/// table of `config_path` and forwards it as a configuration update.
fn spawn_operator_console(
    handle: ControllerHandle,
    config_path: PathBuf,
    active: LoadedConfig,
) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("operator-console".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin read failed: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let event = match line.parse::<OperatorCommand>() {
                    Ok(OperatorCommand::Event(event)) => event,
                    Ok(OperatorCommand::Reload) => match reload_timing(&config_path, &active) {
                        Ok(timing) => {
                            info!("Timing reloaded from {}", config_path.display());
                            ControlEvent::UpdateConfiguration(timing)
                        }
                        Err(e) => {
                            warn!("Reload rejected: {e}");
                            continue;
                        }
                    },
                    Err(e) => {
                        warn!(input = line.trim(), "ignored operator input: {e}");
                        continue;
                    }
                };

                if handle.blocking_send(event).is_err() {
                    break;
                }
            }
            debug!("operator console closed");
        })?;
    Ok(())
}

/// `--verbose` forces DEBUG; otherwise the configured level applies.
fn effective_level(verbose: bool, configured: LogLevel) -> Level {
    let level = if verbose { LogLevel::Debug } else { configured };
    level.as_directive().parse().unwrap_or(Level::INFO)
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = effective_level(args.verbose, configured);

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout stays clean for `--emit-snapshots`.
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
