//! GPIO access addressed by physical header position.
//!
//! - `board`: physical pin numbering and the default candidate lists.
//! - `pins`: digital input/output traits implemented by each backend.
//! - `resolve`: ordered-candidate pin claiming with pull-resistor fallback.
//! - `rppal_backend`: Raspberry-Pi-compatible backend (feature `with-rppal`).

pub mod board;
pub mod error;
pub mod pins;
pub mod resolve;
#[cfg(feature = "with-rppal")]
pub mod rppal_backend;

pub use board::{
    BUTTON_FALLBACKS, BUTTON_PIN, LED_FALLBACKS, LED_PIN, PinCandidates, board_to_bcm,
};
pub use error::{ConfigError, PinError};
pub use pins::{DigitalInput, DigitalOutput, PinController, Pull};
pub use resolve::{PinRole, ResolvedPin, resolve_input, resolve_output};
#[cfg(feature = "with-rppal")]
pub use rppal_backend::RppalController;
