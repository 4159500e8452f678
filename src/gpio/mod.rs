//! GPIO access for the appliance's LEDs and buttons
//!
//! Pins are addressed by their physical position on the 40-pin header
//! (BOARD numbering) and mapped to BCM lines for rppal. Buttons are
//! active-low inputs with the internal pull-up enabled, delivered as
//! debounced falling-edge events.

mod buttons;
mod pins;

pub use buttons::{ButtonError, ButtonEvent, ButtonListener, DebounceFilter};
pub use pins::{claim_input_pullup, claim_output, physical_to_bcm, OutputLine, PinError};
