//! Core state machine implementation
//!
//! The controller is the single consumer of button events and the
//! liveness poll, so transitions are serialized by construction: an
//! event arriving while a transition runs waits in the channel.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::events::{StateEvent, StopReason};
use crate::gpio::{ButtonEvent, OutputLine};
use crate::indicator::Indicator;
use crate::transport::Transport;

/// The three possible playback states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded, activity indicator off
    Stopped,
    /// Track audible, activity indicator solid on
    Playing,
    /// Track held at its position, activity indicator blinking
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "stopped"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
        }
    }
}

/// The state machine coordinating transport, indicator, and inputs
pub struct PlaybackController<T: Transport, L: OutputLine> {
    /// Current state
    state: PlaybackState,
    /// The one track this appliance plays
    audio_file: PathBuf,
    /// Audio engine collaborator
    transport: T,
    /// Activity LED owned by this controller
    indicator: Indicator<L>,
    /// Time when the current non-Stopped state was entered
    state_entered_at: Option<Instant>,
    /// Cadence of the end-of-track check
    poll_interval: Duration,
    /// Channel for emitting transition events
    event_tx: broadcast::Sender<StateEvent>,
}

impl<T: Transport, L: OutputLine> PlaybackController<T, L> {
    pub fn new(
        audio_file: PathBuf,
        transport: T,
        indicator: Indicator<L>,
        poll_interval: Duration,
        event_tx: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            state: PlaybackState::Stopped,
            audio_file,
            transport,
            indicator,
            state_entered_at: None,
            poll_interval,
            event_tx,
        }
    }

    /// Get the current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Run the controller, consuming button events and polling for
    /// end-of-track until the button channel closes.
    pub async fn run(&mut self, mut button_rx: mpsc::Receiver<ButtonEvent>) {
        info!(state = %self.state, "playback controller started");

        let mut poll = time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                event = button_rx.recv() => match event {
                    Some(event) => self.handle_button(event).await,
                    None => break,
                },
                _ = poll.tick() => self.poll_liveness().await,
            }
        }

        info!("playback controller stopped");
    }

    /// Dispatch one debounced button press
    pub async fn handle_button(&mut self, event: ButtonEvent) {
        debug!(button = %event, state = %self.state, "dispatching button event");

        match (self.state, event) {
            (PlaybackState::Stopped, ButtonEvent::Start) => self.start().await,
            (PlaybackState::Playing, ButtonEvent::Start) => self.pause().await,
            (PlaybackState::Paused, ButtonEvent::Start) => self.resume().await,
            (PlaybackState::Stopped, ButtonEvent::Stop) => {
                debug!("stop pressed while already stopped");
            }
            (_, ButtonEvent::Stop) => self.stop_playback(StopReason::StopButton).await,
        }
    }

    /// Detect natural end-of-track.
    ///
    /// Only active playback is monitored: a paused track is legitimately
    /// not busy and must not be mistaken for having ended, and polling
    /// while Stopped would double-stop after a manual stop.
    pub async fn poll_liveness(&mut self) {
        if self.state == PlaybackState::Playing && !self.transport.is_busy() {
            info!("transport idle while playing - track finished");
            self.stop_playback(StopReason::TrackFinished).await;
        }
    }

    /// Release the transport and the indicator before process exit
    pub async fn shutdown(&mut self) {
        info!(state = %self.state, "tearing down playback controller");
        self.transport.stop();
        self.indicator.off().await;
        if self.state != PlaybackState::Stopped {
            self.set_state(PlaybackState::Stopped);
        }
    }

    async fn start(&mut self) {
        info!(file = %self.audio_file.display(), "starting playback");

        if let Err(e) = self.transport.load(&self.audio_file) {
            // Recover to Stopped instead of crashing the daemon; the
            // next press retries the load.
            error!(error = %e, "failed to start playback, staying stopped");
            self.transport.stop();
            self.indicator.off().await;
            let _ = self.event_tx.send(StateEvent::StartFailed);
            return;
        }

        self.transport.play();
        self.indicator.on().await;
        self.set_state(PlaybackState::Playing);
        let _ = self.event_tx.send(StateEvent::PlaybackStarted);
    }

    async fn pause(&mut self) {
        self.transport.pause();
        self.indicator.blink(true).await;
        let played_ms = self.set_state(PlaybackState::Paused);
        let _ = self.event_tx.send(StateEvent::PlaybackPaused { played_ms });
    }

    async fn resume(&mut self) {
        self.transport.unpause();
        self.indicator.on().await;
        self.set_state(PlaybackState::Playing);
        let _ = self.event_tx.send(StateEvent::PlaybackResumed);
    }

    async fn stop_playback(&mut self, reason: StopReason) {
        self.transport.stop();
        self.indicator.off().await;
        let after_ms = self.set_state(PlaybackState::Stopped);
        let _ = self
            .event_tx
            .send(StateEvent::PlaybackStopped { reason, after_ms });
    }

    /// Apply a state change, returning the time spent in the old state
    fn set_state(&mut self, new_state: PlaybackState) -> u64 {
        let old_state = self.state;
        let duration_ms = self
            .state_entered_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_entered_at = if new_state != PlaybackState::Stopped {
            Some(Instant::now())
        } else {
            None
        };

        duration_ms
    }
}
