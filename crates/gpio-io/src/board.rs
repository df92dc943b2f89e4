//! Physical (BOARD) pin numbering for the 40-pin header.

/// Physical header position of the feedback LED.
pub const LED_PIN: u8 = 31;
/// Alternative LED positions, tried in order when [`LED_PIN`] cannot be claimed.
pub const LED_FALLBACKS: [u8; 5] = [29, 31, 33, 35, 37];

/// Physical header position of the momentary button.
pub const BUTTON_PIN: u8 = 13;
/// Alternative button positions, tried in order when [`BUTTON_PIN`] cannot be claimed.
pub const BUTTON_FALLBACKS: [u8; 5] = [11, 13, 15, 16, 18];

/// Header position to SoC GPIO line. `None` marks power and ground pins.
const HEADER: [Option<u8>; 40] = [
    None,     // 1  3V3
    None,     // 2  5V
    Some(2),  // 3
    None,     // 4  5V
    Some(3),  // 5
    None,     // 6  GND
    Some(4),  // 7
    Some(14), // 8
    None,     // 9  GND
    Some(15), // 10
    Some(17), // 11
    Some(18), // 12
    Some(27), // 13
    None,     // 14 GND
    Some(22), // 15
    Some(23), // 16
    None,     // 17 3V3
    Some(24), // 18
    Some(10), // 19
    None,     // 20 GND
    Some(9),  // 21
    Some(25), // 22
    Some(11), // 23
    Some(8),  // 24
    None,     // 25 GND
    Some(7),  // 26
    Some(0),  // 27
    Some(1),  // 28
    Some(5),  // 29
    None,     // 30 GND
    Some(6),  // 31
    Some(12), // 32
    Some(13), // 33
    None,     // 34 GND
    Some(19), // 35
    Some(16), // 36
    Some(26), // 37
    Some(20), // 38
    None,     // 39 GND
    Some(21), // 40
];

/// Translate a physical header position (1..=40) into its GPIO line number.
pub fn board_to_bcm(physical: u8) -> Option<u8> {
    let index = usize::from(physical).checked_sub(1)?;
    HEADER.get(index).copied().flatten()
}

/// A preferred pin plus the ordered alternatives tried after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinCandidates {
    pub primary: u8,
    pub fallbacks: Vec<u8>,
}

impl PinCandidates {
    pub fn new(primary: u8, fallbacks: impl Into<Vec<u8>>) -> Self {
        Self {
            primary,
            fallbacks: fallbacks.into(),
        }
    }

    pub fn led() -> Self {
        Self::new(LED_PIN, LED_FALLBACKS)
    }

    pub fn button() -> Self {
        Self::new(BUTTON_PIN, BUTTON_FALLBACKS)
    }

    /// Primary first, then fallbacks, each pin at most once.
    pub fn ordered(&self) -> Vec<u8> {
        let mut order = Vec::with_capacity(self.fallbacks.len() + 1);
        for pin in std::iter::once(self.primary).chain(self.fallbacks.iter().copied()) {
            if !order.contains(&pin) {
                order.push(pin);
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pins_map_to_gpio_lines() {
        assert_eq!(board_to_bcm(LED_PIN), Some(6));
        assert_eq!(board_to_bcm(BUTTON_PIN), Some(27));
        for pin in LED_FALLBACKS.iter().chain(BUTTON_FALLBACKS.iter()) {
            assert!(board_to_bcm(*pin).is_some(), "pin {pin} should be a GPIO");
        }
    }

    #[test]
    fn power_ground_and_out_of_range_are_rejected() {
        for pin in [0, 1, 2, 4, 6, 9, 14, 17, 20, 25, 30, 34, 39, 41, 255] {
            assert_eq!(board_to_bcm(pin), None, "pin {pin}");
        }
    }

    #[test]
    fn ordered_candidates_skip_repeats() {
        assert_eq!(PinCandidates::led().ordered(), vec![31, 29, 33, 35, 37]);
        assert_eq!(PinCandidates::button().ordered(), vec![13, 11, 15, 16, 18]);
        assert_eq!(PinCandidates::new(7, Vec::new()).ordered(), vec![7]);
    }
}
