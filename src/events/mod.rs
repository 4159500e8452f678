//! Events emitted by the playback controller on state transitions
//!
//! Observers (currently the supervisor's event log loop) subscribe via a
//! broadcast channel; these types are serializable so a future external
//! surface can forward them unchanged.

use serde::{Deserialize, Serialize};

/// Why playback returned to the stopped state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The stop button was pressed
    StopButton,

    /// The liveness poll found the transport idle while playing
    TrackFinished,
}

/// Events emitted by the controller during transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateEvent {
    /// Playback started from the stopped state
    PlaybackStarted,

    /// Playback paused (start button pressed while playing)
    PlaybackPaused {
        /// Milliseconds spent playing before the pause
        played_ms: u64,
    },

    /// Playback resumed from pause
    PlaybackResumed,

    /// Playback returned to stopped
    PlaybackStopped {
        reason: StopReason,
        /// Milliseconds spent in the state that was left
        after_ms: u64,
    },

    /// Starting playback failed; the controller recovered to stopped
    StartFailed,
}

impl std::fmt::Display for StateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateEvent::PlaybackStarted => write!(f, "PLAYBACK_STARTED"),
            StateEvent::PlaybackPaused { played_ms } => {
                write!(f, "PLAYBACK_PAUSED ({}ms)", played_ms)
            }
            StateEvent::PlaybackResumed => write!(f, "PLAYBACK_RESUMED"),
            StateEvent::PlaybackStopped { reason, after_ms } => {
                let reason = match reason {
                    StopReason::StopButton => "stop button",
                    StopReason::TrackFinished => "track finished",
                };
                write!(f, "PLAYBACK_STOPPED ({}, {}ms)", reason, after_ms)
            }
            StateEvent::StartFailed => write!(f, "START_FAILED"),
        }
    }
}
