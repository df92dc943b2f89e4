//! `rppal`-backed controller for Raspberry-Pi-compatible 40-pin headers.

use rppal::gpio::{Error as GpioError, Gpio, InputPin, OutputPin};
use tracing::debug;

use crate::{
    board::board_to_bcm,
    error::{ConfigError, PinError},
    pins::{DigitalInput, DigitalOutput, PinController, Pull},
};

/// GPIO through `/dev/gpiomem` on Raspberry-Pi-compatible boards.
///
/// `rppal` applies bias resistors without reporting failure, so this backend
/// never returns [`PinError::PullUnsupported`]; a pull-down request either
/// claims the line or fails for the same reason a plain input would.
pub struct RppalController {
    gpio: Gpio,
}

impl RppalController {
    pub fn new() -> Result<Self, ConfigError> {
        let gpio = Gpio::new().map_err(|err| ConfigError::Controller(err.to_string()))?;
        Ok(Self { gpio })
    }

    fn line(&self, physical: u8) -> Result<rppal::gpio::Pin, PinError> {
        let bcm = board_to_bcm(physical).ok_or(PinError::NotGpio(physical))?;
        debug!("physical pin {physical} -> GPIO{bcm}");
        self.gpio.get(bcm).map_err(|err| map_error(physical, err))
    }
}

impl PinController for RppalController {
    type Output = RppalOutput;
    type Input = RppalInput;

    fn claim_output(&mut self, physical: u8) -> Result<RppalOutput, PinError> {
        let pin = self.line(physical)?.into_output_low();
        Ok(RppalOutput { pin: Some(pin) })
    }

    fn claim_input(&mut self, physical: u8, pull: Pull) -> Result<RppalInput, PinError> {
        let line = self.line(physical)?;
        let pin = match pull {
            Pull::Down => line.into_input_pulldown(),
            Pull::None => line.into_input(),
        };
        Ok(RppalInput { pin: Some(pin) })
    }
}

fn map_error(physical: u8, err: GpioError) -> PinError {
    match err {
        GpioError::PinUsed(_) => PinError::Unavailable {
            pin: physical,
            reason: "in use".to_string(),
        },
        // The SoC has no such line (header layout differs from the board's).
        GpioError::PinNotAvailable(_) => PinError::NotGpio(physical),
        other => PinError::Unavailable {
            pin: physical,
            reason: other.to_string(),
        },
    }
}

/// Output line; dropping the inner pin restores the line's original mode.
pub struct RppalOutput {
    pin: Option<OutputPin>,
}

impl DigitalOutput for RppalOutput {
    fn set_high(&mut self) {
        if let Some(pin) = self.pin.as_mut() {
            pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if let Some(pin) = self.pin.as_mut() {
            pin.set_low();
        }
    }

    fn reset(&mut self) {
        if let Some(mut pin) = self.pin.take() {
            pin.set_low();
        }
    }
}

pub struct RppalInput {
    pin: Option<InputPin>,
}

impl DigitalInput for RppalInput {
    fn is_high(&self) -> bool {
        self.pin.as_ref().is_some_and(|pin| pin.is_high())
    }

    fn reset(&mut self) {
        self.pin.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claimed_line_is_reported_as_in_use() {
        let err = map_error(31, GpioError::PinUsed(6));
        assert_eq!(
            err,
            PinError::Unavailable {
                pin: 31,
                reason: "in use".to_string(),
            }
        );
        assert_eq!(err.to_string(), "pin 31 unavailable: in use");
    }

    #[test]
    fn missing_soc_line_is_not_a_gpio() {
        assert_eq!(
            map_error(31, GpioError::PinNotAvailable(6)),
            PinError::NotGpio(31)
        );
    }

    #[test]
    fn other_rppal_errors_keep_their_message() {
        let err = map_error(13, GpioError::PermissionDenied("/dev/gpiomem".into()));
        assert!(matches!(err, PinError::Unavailable { pin: 13, .. }));
    }
}
