use thiserror::Error;

use crate::resolve::PinRole;

/// Failure to claim a single pin in a single electrical mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("physical pin {0} is not a GPIO line")]
    NotGpio(u8),
    #[error("pin {pin} unavailable: {reason}")]
    Unavailable { pin: u8, reason: String },
    #[error("pin {0} does not support a pull-down resistor")]
    PullUnsupported(u8),
}

/// Pin configuration failed for every candidate of a role.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not set up any {role} pin (tried {tried:?})")]
    Exhausted { role: PinRole, tried: Vec<u8> },
    #[error("GPIO controller unavailable: {0}")]
    Controller(String),
}
