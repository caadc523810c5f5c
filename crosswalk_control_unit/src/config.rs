//! Controller configuration loader with validation and hot reload.
//!
//! One TOML file carries three tables:
//!
//! ```toml
//! [shared]
//! service_name = "crosswalk-main-st"
//! log_level = "info"
//!
//! [controller]
//! tick_period_ms = 1000
//! event_queue_capacity = 64
//! initial_mode = "Automatic"
//!
//! [timing]
//! car_green = 15
//! ped_green = 10
//! yellow = 3
//! all_red_safety = 2
//! green_line_preference = "Vehicle"
//! ```
//!
//! Every table is optional and falls back to product defaults. Only
//! `[timing]` may change while the controller runs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crosswalk_common::config::{ConfigError, ConfigLoader, SharedConfig};
use crosswalk_common::consts::{DEFAULT_EVENT_QUEUE_CAPACITY, DEFAULT_TICK_PERIOD_MS};
use crosswalk_common::signal::config::TimingConfig;
use crosswalk_common::signal::state::Mode;

// ─── Error Types ────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("config validation: {0}")]
    Validation(String),
}

/// Hot reload was refused. The active configuration stays in force.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("ERR_RELOAD_VALIDATION_FAILED: {0}")]
    Invalid(#[from] LoadError),

    /// A field outside `[timing]` differs from the running configuration.
    #[error("ERR_RELOAD_SCOPE_VIOLATION: {0}")]
    ScopeViolation(String),
}

// ─── Controller Table ───────────────────────────────────────────────

/// Scheduler parameters from the `[controller]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Length of one time unit [ms].
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    /// Bounded inbound queue size. Senders wait when it is full.
    #[serde(default = "default_event_queue_capacity")]
    pub event_queue_capacity: usize,
    /// Mode entered at start-up. Override is not allowed here.
    #[serde(default)]
    pub initial_mode: Mode,
}

fn default_tick_period_ms() -> u64 {
    DEFAULT_TICK_PERIOD_MS
}

fn default_event_queue_capacity() -> usize {
    DEFAULT_EVENT_QUEUE_CAPACITY
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            event_queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            initial_mode: Mode::Automatic,
        }
    }
}

impl ControllerConfig {
    #[inline]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.tick_period_ms == 0 {
            return Err(LoadError::Validation(
                "tick_period_ms must be > 0".to_string(),
            ));
        }
        if self.event_queue_capacity == 0 {
            return Err(LoadError::Validation(
                "event_queue_capacity must be > 0".to_string(),
            ));
        }
        if self.initial_mode == Mode::Override {
            return Err(LoadError::Validation(
                "initial_mode must be Automatic or Manual".to_string(),
            ));
        }
        Ok(())
    }
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadedConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the controller configuration file.
pub fn load_config(path: &Path) -> Result<LoadedConfig, LoadError> {
    let loaded = LoadedConfig::load(path)?;
    validate(&loaded)?;
    Ok(loaded)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, LoadError> {
    let loaded = LoadedConfig::from_toml_str(content)?;
    validate(&loaded)?;
    Ok(loaded)
}

fn validate(loaded: &LoadedConfig) -> Result<(), LoadError> {
    loaded.shared.validate()?;
    loaded.controller.validate()?;
    warn_clamped(&loaded.timing);
    Ok(())
}

/// Log every duration the engine will raise to the one-tick floor.
pub fn warn_clamped(timing: &TimingConfig) {
    for field in timing.clamped_fields() {
        warn!(field, "non-positive duration will be clamped to 1 tick");
    }
}

// ─── Hot Reload ─────────────────────────────────────────────────────

/// Re-read the configuration file and return its `[timing]` table.
///
/// The shadow file is fully validated first; any difference outside
/// `[timing]` rejects the reload.
pub fn reload_timing(path: &Path, active: &LoadedConfig) -> Result<TimingConfig, ReloadError> {
    let shadow = load_config(path)?;
    validate_reload_scope(active, &shadow)?;
    Ok(shadow.timing)
}

/// Same as [`reload_timing`] for an in-memory document.
pub fn reload_timing_from_str(
    content: &str,
    active: &LoadedConfig,
) -> Result<TimingConfig, ReloadError> {
    let shadow = load_config_from_str(content)?;
    validate_reload_scope(active, &shadow)?;
    Ok(shadow.timing)
}

fn validate_reload_scope(active: &LoadedConfig, shadow: &LoadedConfig) -> Result<(), ReloadError> {
    let mut changed = Vec::new();
    if active.shared.service_name != shadow.shared.service_name {
        changed.push("shared.service_name");
    }
    if active.shared.log_level != shadow.shared.log_level {
        changed.push("shared.log_level");
    }
    if active.controller.tick_period_ms != shadow.controller.tick_period_ms {
        changed.push("controller.tick_period_ms");
    }
    if active.controller.event_queue_capacity != shadow.controller.event_queue_capacity {
        changed.push("controller.event_queue_capacity");
    }
    if active.controller.initial_mode != shadow.controller.initial_mode {
        changed.push("controller.initial_mode");
    }

    if changed.is_empty() {
        Ok(())
    } else {
        Err(ReloadError::ScopeViolation(format!(
            "non-reloadable fields changed: {}",
            changed.join(", ")
        )))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
