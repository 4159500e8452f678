//! Status indicator LEDs
//!
//! An [`Indicator`] wraps one output line and owns at most one
//! [`Blinker`], the cancellable background task that toggles the line
//! while playback is paused.

mod blink;
mod led;

pub use blink::Blinker;
pub use led::Indicator;
