//! Audio transport collaborator
//!
//! The playback controller drives the audio engine through this narrow
//! interface; [`Player`] is the rodio-backed implementation used in
//! production, and tests substitute a scriptable mock.

mod player;

use std::path::{Path, PathBuf};

pub use player::Player;

/// Errors from the audio engine
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open audio file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode audio file: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("failed to open audio output device: {0}")]
    Device(#[from] rodio::StreamError),

    #[error("failed to create playback sink: {0}")]
    Sink(#[from] rodio::PlayError),
}

/// Narrow control surface of the audio engine.
///
/// `load` followed by `play` starts the track from the beginning.
/// `is_busy` reports whether audio is actively playing; it is false both
/// after the track drains and while paused, so callers watching for
/// end-of-track must only consult it while they believe playback is
/// active.
pub trait Transport: Send {
    /// Prepare the given file for playback, replacing any loaded track.
    fn load(&mut self, path: &Path) -> Result<(), TransportError>;

    /// Begin or continue playback of the loaded track.
    fn play(&mut self);

    /// Suspend playback, keeping the position.
    fn pause(&mut self);

    /// Continue playback from the paused position.
    fn unpause(&mut self);

    /// Stop playback and discard the loaded track.
    fn stop(&mut self);

    /// Whether audio is actively playing right now.
    fn is_busy(&self) -> bool;
}
