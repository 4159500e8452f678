//! Physical header pin mapping and pin claiming
//!
//! The wiring diagram for this appliance is written in physical pin
//! positions, so the configuration keeps BOARD numbering and the mapping
//! to BCM lines lives here.

use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::debug;

/// A single digital output line.
///
/// This is the seam between the indicator core and the hardware; real
/// pins implement it, and tests substitute a recording mock.
pub trait OutputLine: Send + 'static {
    /// Drive the line to the given logical level.
    fn set_level(&mut self, high: bool);
}

impl OutputLine for OutputPin {
    fn set_level(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Errors raised while claiming pins at startup
#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("physical pin {0} is not a GPIO-capable header position")]
    NotGpio(u8),

    #[error("GPIO access failed: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

/// Map a physical 40-pin header position to its BCM GPIO line.
///
/// Power, ground, and ID EEPROM positions have no GPIO line and return
/// `None`.
pub fn physical_to_bcm(physical: u8) -> Option<u8> {
    match physical {
        3 => Some(2),
        5 => Some(3),
        7 => Some(4),
        8 => Some(14),
        10 => Some(15),
        11 => Some(17),
        12 => Some(18),
        13 => Some(27),
        15 => Some(22),
        16 => Some(23),
        18 => Some(24),
        19 => Some(10),
        21 => Some(9),
        22 => Some(25),
        23 => Some(11),
        24 => Some(8),
        26 => Some(7),
        29 => Some(5),
        31 => Some(6),
        32 => Some(12),
        33 => Some(13),
        35 => Some(19),
        36 => Some(16),
        37 => Some(26),
        38 => Some(20),
        40 => Some(21),
        _ => None,
    }
}

/// Claim a physical pin as an output, initially driven low.
pub fn claim_output(gpio: &Gpio, physical: u8) -> Result<OutputPin, PinError> {
    let bcm = physical_to_bcm(physical).ok_or(PinError::NotGpio(physical))?;
    let pin = gpio.get(bcm)?.into_output_low();
    debug!(physical, bcm, "claimed output pin");
    Ok(pin)
}

/// Claim a physical pin as an input with the internal pull-up enabled.
pub fn claim_input_pullup(gpio: &Gpio, physical: u8) -> Result<InputPin, PinError> {
    let bcm = physical_to_bcm(physical).ok_or(PinError::NotGpio(physical))?;
    let pin = gpio.get(bcm)?.into_input_pullup();
    debug!(physical, bcm, "claimed input pin with pull-up");
    Ok(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wiring_maps() {
        // The four pins this appliance ships with.
        assert_eq!(physical_to_bcm(16), Some(23)); // start button
        assert_eq!(physical_to_bcm(18), Some(24)); // stop button
        assert_eq!(physical_to_bcm(22), Some(25)); // power LED
        assert_eq!(physical_to_bcm(24), Some(8)); // activity LED
    }

    #[test]
    fn test_non_gpio_positions_rejected() {
        // Power and ground positions.
        assert_eq!(physical_to_bcm(1), None);
        assert_eq!(physical_to_bcm(2), None);
        assert_eq!(physical_to_bcm(6), None);
        assert_eq!(physical_to_bcm(39), None);
        // Off the header entirely.
        assert_eq!(physical_to_bcm(0), None);
        assert_eq!(physical_to_bcm(41), None);
    }

    #[test]
    fn test_id_eeprom_positions_rejected() {
        assert_eq!(physical_to_bcm(27), None);
        assert_eq!(physical_to_bcm(28), None);
    }
}
