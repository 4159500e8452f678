//! Playback state machine
//!
//! Three states driven by two buttons and a liveness poll:
//! - Stopped: no audio, activity LED off
//! - Playing: track audible, activity LED solid on
//! - Paused: track held, activity LED blinking

mod machine;

pub use machine::{PlaybackController, PlaybackState};
