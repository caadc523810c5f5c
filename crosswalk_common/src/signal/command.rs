//! Inbound events for the signal controller.
//!
//! [`ControlEvent`] has one variant per event kind the controller accepts.
//! Operator text input is parsed into [`OperatorCommand`], which wraps a
//! `ControlEvent` or asks the host to reload its configuration file.
//!
//! ## Operator grammar
//!
//! ```text
//! tick
//! detect <vehicle 0|1> <pedestrian 0|1>
//! clear
//! mode automatic|manual
//! override vehicle red|yellow|green
//! override pedestrian red|green
//! reload
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::config::TimingConfig;
use super::state::{DetectionState, Mode, PedestrianLight, VehicleLight};

// ─── Events ─────────────────────────────────────────────────────────

/// A forced colour for one head. The other head's colour is derived by the
/// controller so the pair stays mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverrideRequest {
    Vehicle(VehicleLight),
    Pedestrian(PedestrianLight),
}

/// One event delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// One time unit elapsed.
    Tick,
    /// Fresh presence flags from the vision collaborator.
    DetectionUpdate(DetectionState),
    /// Reset both presence flags.
    ClearDetections,
    /// Reinitialise the cycle for a mode.
    SetMode(Mode),
    /// Force a colour on one head for a bounded time.
    RequestOverride(OverrideRequest),
    /// Replace the timing configuration.
    UpdateConfiguration(TimingConfig),
}

impl ControlEvent {
    /// Short kind name for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::DetectionUpdate(_) => "detection_update",
            Self::ClearDetections => "clear_detections",
            Self::SetMode(_) => "set_mode",
            Self::RequestOverride(_) => "request_override",
            Self::UpdateConfiguration(_) => "update_configuration",
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick => write!(f, "tick"),
            Self::DetectionUpdate(d) => write!(
                f,
                "detect vehicle={} pedestrian={}",
                d.vehicle_present, d.pedestrian_present
            ),
            Self::ClearDetections => write!(f, "clear"),
            Self::SetMode(mode) => write!(f, "mode {mode:?}"),
            Self::RequestOverride(OverrideRequest::Vehicle(c)) => {
                write!(f, "override vehicle {c:?}")
            }
            Self::RequestOverride(OverrideRequest::Pedestrian(c)) => {
                write!(f, "override pedestrian {c:?}")
            }
            Self::UpdateConfiguration(_) => write!(f, "update configuration"),
        }
    }
}

// ─── Operator Commands ──────────────────────────────────────────────

/// A parsed operator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    Event(ControlEvent),
    /// Re-read the configuration file and apply its `[timing]` table.
    Reload,
}

/// Operator input could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },

    #[error("pedestrian heads have no yellow lamp")]
    PedestrianYellow,

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl FromStr for OperatorCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let lowered = line.trim().to_ascii_lowercase();
        let mut words = lowered.split_whitespace();
        let head = words.next().ok_or(CommandParseError::Empty)?;

        let command = match head {
            "tick" => Self::Event(ControlEvent::Tick),
            "clear" => Self::Event(ControlEvent::ClearDetections),
            "reload" => Self::Reload,
            "detect" => {
                let vehicle = parse_flag(words.next(), "detect")?;
                let pedestrian = parse_flag(words.next(), "detect")?;
                Self::Event(ControlEvent::DetectionUpdate(DetectionState::new(
                    vehicle, pedestrian,
                )))
            }
            "mode" => {
                let mode = match words.next() {
                    Some("automatic" | "auto") => Mode::Automatic,
                    Some("manual") => Mode::Manual,
                    Some(other) => {
                        return Err(CommandParseError::InvalidArgument {
                            command: "mode",
                            value: other.to_string(),
                        });
                    }
                    None => {
                        return Err(CommandParseError::MissingArgument {
                            command: "mode",
                            expected: "automatic|manual",
                        });
                    }
                };
                Self::Event(ControlEvent::SetMode(mode))
            }
            "override" => {
                let target = words.next().ok_or(CommandParseError::MissingArgument {
                    command: "override",
                    expected: "vehicle|pedestrian",
                })?;
                let colour = words.next().ok_or(CommandParseError::MissingArgument {
                    command: "override",
                    expected: "red|yellow|green",
                })?;
                Self::Event(ControlEvent::RequestOverride(parse_override(
                    target, colour,
                )?))
            }
            other => return Err(CommandParseError::UnknownCommand(other.to_string())),
        };

        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(CommandParseError::TrailingInput(rest.join(" ")));
        }
        Ok(command)
    }
}

fn parse_flag(word: Option<&str>, command: &'static str) -> Result<bool, CommandParseError> {
    match word {
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(CommandParseError::InvalidArgument {
            command,
            value: other.to_string(),
        }),
        None => Err(CommandParseError::MissingArgument {
            command,
            expected: "<vehicle 0|1> <pedestrian 0|1>",
        }),
    }
}

fn parse_override(target: &str, colour: &str) -> Result<OverrideRequest, CommandParseError> {
    let invalid = |value: &str| CommandParseError::InvalidArgument {
        command: "override",
        value: value.to_string(),
    };

    match target {
        "vehicle" | "car" => {
            let light = match colour {
                "red" => VehicleLight::Red,
                "yellow" | "amber" => VehicleLight::Yellow,
                "green" => VehicleLight::Green,
                other => return Err(invalid(other)),
            };
            Ok(OverrideRequest::Vehicle(light))
        }
        "pedestrian" | "ped" => {
            let light = match colour {
                "red" => PedestrianLight::Red,
                "green" => PedestrianLight::Green,
                "yellow" | "amber" => return Err(CommandParseError::PedestrianYellow),
                other => return Err(invalid(other)),
            };
            Ok(OverrideRequest::Pedestrian(light))
        }
        other => Err(invalid(other)),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
