use crate::error::PinError;

/// Input bias resistor requested when claiming an input pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pull {
    Down,
    None,
}

pub trait DigitalOutput {
    fn set_high(&mut self);
    fn set_low(&mut self);

    /// Drive low and hand the line back in a neutral state.
    fn reset(&mut self);
}

pub trait DigitalInput {
    fn is_high(&self) -> bool;

    fn reset(&mut self);
}

/// Hands out pins addressed by physical header position.
pub trait PinController {
    type Output: DigitalOutput;
    type Input: DigitalInput;

    fn claim_output(&mut self, physical: u8) -> Result<Self::Output, PinError>;
    fn claim_input(&mut self, physical: u8, pull: Pull) -> Result<Self::Input, PinError>;
}
