//! Debounced button edge listener
//!
//! Registers falling-edge interrupts on the two button pins. The
//! callbacks run on rppal's interrupt thread; each applies a per-button
//! debounce filter and pushes at most one event per physical press into
//! a bounded channel, where the controller's run loop consumes them one
//! at a time.

use std::time::{Duration, Instant};

use rppal::gpio::{InputPin, Trigger};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A single debounced button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// The start/pause button
    Start,
    /// The stop button
    Stop,
}

impl std::fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonEvent::Start => write!(f, "start"),
            ButtonEvent::Stop => write!(f, "stop"),
        }
    }
}

/// Errors that can occur in the button listener
#[derive(Debug, thiserror::Error)]
pub enum ButtonError {
    #[error("failed to register edge interrupt: {0}")]
    Interrupt(#[from] rppal::gpio::Error),
}

/// Suppresses repeated edges from a single physical press.
///
/// A mechanical button bounces for a few milliseconds on each press; any
/// edge within the window after an accepted one is discarded.
#[derive(Debug)]
pub struct DebounceFilter {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl DebounceFilter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    /// Returns true if an edge observed at `now` counts as a new press.
    pub fn accept(&mut self, now: Instant) -> bool {
        match self.last_accepted {
            Some(prev) if now.duration_since(prev) < self.window => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }
}

/// Listens for button presses and forwards them to the controller
pub struct ButtonListener {
    start_pin: InputPin,
    stop_pin: InputPin,
    debounce: Duration,
    event_tx: mpsc::Sender<ButtonEvent>,
}

impl ButtonListener {
    /// Create a new listener over the two claimed button pins
    pub fn new(
        start_pin: InputPin,
        stop_pin: InputPin,
        debounce: Duration,
        event_tx: mpsc::Sender<ButtonEvent>,
    ) -> Self {
        Self {
            start_pin,
            stop_pin,
            debounce,
            event_tx,
        }
    }

    /// Register the falling-edge interrupts on both pins.
    ///
    /// The buttons are wired active-low against the internal pull-up, so
    /// a press is a falling edge. Callbacks run on rppal's interrupt
    /// thread until `stop()` is called or the pins are dropped.
    pub fn start(&mut self) -> Result<(), ButtonError> {
        Self::watch(&mut self.start_pin, ButtonEvent::Start, self.debounce, &self.event_tx)?;
        Self::watch(&mut self.stop_pin, ButtonEvent::Stop, self.debounce, &self.event_tx)?;
        info!(debounce_ms = self.debounce.as_millis() as u64, "button listener started");
        Ok(())
    }

    fn watch(
        pin: &mut InputPin,
        source: ButtonEvent,
        debounce: Duration,
        event_tx: &mpsc::Sender<ButtonEvent>,
    ) -> Result<(), ButtonError> {
        let mut filter = DebounceFilter::new(debounce);
        let event_tx = event_tx.clone();

        pin.set_async_interrupt(Trigger::FallingEdge, None, move |_event| {
            if !filter.accept(Instant::now()) {
                debug!(button = %source, "edge suppressed by debounce");
                return;
            }

            debug!(button = %source, "button pressed");

            // We are on the interrupt thread, not in an async context.
            if event_tx.blocking_send(source).is_err() {
                warn!(button = %source, "failed to send button event - channel closed?");
            }
        })?;

        Ok(())
    }

    /// Deregister the edge interrupts
    pub fn stop(&mut self) {
        if let Err(e) = self.start_pin.clear_async_interrupt() {
            warn!(?e, "failed to clear start button interrupt");
        }
        if let Err(e) = self.stop_pin.clear_async_interrupt() {
            warn!(?e, "failed to clear stop button interrupt");
        }
        info!("button listener stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_edge_accepted() {
        let mut filter = DebounceFilter::new(Duration::from_millis(500));
        assert!(filter.accept(Instant::now()));
    }

    #[test]
    fn test_double_press_within_window_collapses() {
        let mut filter = DebounceFilter::new(Duration::from_millis(500));
        let t0 = Instant::now();

        assert!(filter.accept(t0));
        // Bounce 5ms later and a second press 400ms later both land
        // inside the window.
        assert!(!filter.accept(t0 + Duration::from_millis(5)));
        assert!(!filter.accept(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn test_press_after_window_accepted() {
        let mut filter = DebounceFilter::new(Duration::from_millis(500));
        let t0 = Instant::now();

        assert!(filter.accept(t0));
        assert!(filter.accept(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_window_restarts_from_accepted_edge_only() {
        let mut filter = DebounceFilter::new(Duration::from_millis(500));
        let t0 = Instant::now();

        assert!(filter.accept(t0));
        assert!(!filter.accept(t0 + Duration::from_millis(450)));
        // 550ms after the accepted edge; the suppressed one did not
        // extend the window.
        assert!(filter.accept(t0 + Duration::from_millis(550)));
    }

    #[test]
    fn test_event_display() {
        assert_eq!(ButtonEvent::Start.to_string(), "start");
        assert_eq!(ButtonEvent::Stop.to_string(), "stop");
    }
}
