//! Rodio-backed audio transport

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, info};

use super::{Transport, TransportError};

/// Audio playback on the default output device.
///
/// One output stream is opened for the lifetime of the process; each
/// loaded track gets a fresh [`Sink`]. A sink whose queue has drained is
/// how natural end-of-track shows up (`is_busy` turns false).
pub struct Player {
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl Player {
    /// Open the default audio output device.
    pub fn new() -> Result<Self, TransportError> {
        let (stream, handle) = OutputStream::try_default()?;

        // The stream must outlive every sink created from its handle.
        // It is needed until process exit, so leak it rather than
        // carrying a !Send value around.
        std::mem::forget(stream);

        info!("audio output device opened");
        Ok(Self { handle, sink: None })
    }
}

impl Transport for Player {
    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let file = File::open(path).map_err(|source| TransportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file))?;

        let sink = Sink::try_new(&self.handle)?;
        sink.pause();
        sink.append(source);
        self.sink = Some(sink);

        debug!(file = %path.display(), "track loaded");
        Ok(())
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }
}
