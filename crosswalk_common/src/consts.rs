//! System-wide constants for the crosswalk workspace.
//!
//! Single source of truth for timing floors and defaults.
//! Imported by every crate in the workspace.

/// Shortest hold any phase may have [ticks]. Non-positive configured
/// durations are clamped up to this value.
pub const MIN_PHASE_TICKS: u32 = 1;

/// Shortest hold of a forced override [ticks], regardless of configuration.
pub const MIN_OVERRIDE_TICKS: u32 = 5;

/// Snapshots buffered per stream reader before it is reported as lagging.
pub const SNAPSHOT_STREAM_CAPACITY: usize = 256;

/// Default vehicle green duration [ticks].
pub const DEFAULT_CAR_GREEN: i64 = 15;

/// Default pedestrian green duration [ticks].
pub const DEFAULT_PED_GREEN: i64 = 10;

/// Default vehicle amber duration [ticks].
pub const DEFAULT_YELLOW: i64 = 3;

/// Default all-red safety buffer [ticks].
pub const DEFAULT_ALL_RED_SAFETY: i64 = 2;

/// Default tick period in milliseconds (one time unit = 1 s).
pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;

/// Default capacity of the controller's inbound event queue.
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 64;

/// Default controller configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "config/controller.toml";
