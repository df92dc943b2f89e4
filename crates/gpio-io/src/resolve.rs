//! Ordered-candidate pin resolution.
//!
//! Each role walks its candidate list in order and keeps the first pin that
//! can be claimed. Inputs prefer a pull-down resistor; when a pin reports that
//! pull-down is unsupported, the same pin is retried without a pull before
//! moving on to the next candidate.

use std::fmt;

use tracing::{info, warn};

use crate::{
    board::PinCandidates,
    error::{ConfigError, PinError},
    pins::{PinController, Pull},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinRole {
    Led,
    Button,
}

impl PinRole {
    pub fn label(self) -> &'static str {
        match self {
            PinRole::Led => "LED",
            PinRole::Button => "button",
        }
    }
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The pin a role ended up on, and how it was configured.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPin {
    pub role: PinRole,
    pub physical: u8,
    pub pull: Pull,
    /// `true` when the primary pin failed and a fallback was used.
    pub fallback: bool,
}

pub fn resolve_output<C: PinController>(
    controller: &mut C,
    candidates: &PinCandidates,
) -> Result<(C::Output, ResolvedPin), ConfigError> {
    let order = candidates.ordered();
    for pin in &order {
        let pin = *pin;
        match controller.claim_output(pin) {
            Ok(output) => {
                let resolved = ResolvedPin {
                    role: PinRole::Led,
                    physical: pin,
                    pull: Pull::None,
                    fallback: pin != candidates.primary,
                };
                report_success(&resolved);
                return Ok((output, resolved));
            }
            Err(err) => report_failure(PinRole::Led, pin, candidates.primary, &err),
        }
    }

    Err(ConfigError::Exhausted {
        role: PinRole::Led,
        tried: order,
    })
}

pub fn resolve_input<C: PinController>(
    controller: &mut C,
    candidates: &PinCandidates,
) -> Result<(C::Input, ResolvedPin), ConfigError> {
    let order = candidates.ordered();
    for pin in &order {
        let pin = *pin;
        let attempt = match controller.claim_input(pin, Pull::Down) {
            Err(PinError::PullUnsupported(_)) => {
                warn!("Button pin {pin}: pull-down unsupported, retrying without pull resistor");
                controller
                    .claim_input(pin, Pull::None)
                    .map(|input| (input, Pull::None))
            }
            other => other.map(|input| (input, Pull::Down)),
        };

        match attempt {
            Ok((input, pull)) => {
                let resolved = ResolvedPin {
                    role: PinRole::Button,
                    physical: pin,
                    pull,
                    fallback: pin != candidates.primary,
                };
                report_success(&resolved);
                return Ok((input, resolved));
            }
            Err(err) => report_failure(PinRole::Button, pin, candidates.primary, &err),
        }
    }

    Err(ConfigError::Exhausted {
        role: PinRole::Button,
        tried: order,
    })
}

fn report_success(resolved: &ResolvedPin) {
    let suffix = match (resolved.role, resolved.pull) {
        (PinRole::Button, Pull::None) => " (no pull resistor)",
        _ => "",
    };
    if resolved.fallback {
        info!(
            "{} pin {} setup successful using fallback candidate{suffix}",
            resolved.role, resolved.physical
        );
    } else {
        info!(
            "{} pin {} setup successful{suffix}",
            resolved.role, resolved.physical
        );
    }
}

fn report_failure(role: PinRole, pin: u8, primary: u8, err: &PinError) {
    warn!("Error setting up {role} pin {pin}: {err}");
    if pin == primary {
        info!("Trying alternative {role} pins...");
    }
}
