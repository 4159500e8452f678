//! pushplay: two-button audio playback appliance daemon
//!
//! Runs on a Raspberry Pi wired with two momentary buttons and two
//! status LEDs:
//! - start button: toggles play/pause of the one configured track
//! - stop button: forces playback back to stopped
//! - green power LED: solid on while the daemon runs
//! - yellow activity LED: solid = playing, blinking = paused, off = stopped
//!
//! Button edges are debounced at the GPIO layer and serialized through a
//! bounded channel into the playback controller, which also runs the
//! 1-second liveness poll that catches natural end-of-track.

mod config;
mod events;
mod gpio;
mod indicator;
mod lifecycle;
mod state;
#[cfg(test)]
mod testing;
mod transport;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::events::StateEvent;
use crate::gpio::ButtonListener;
use crate::indicator::Indicator;
use crate::lifecycle::ShutdownSignal;
use crate::state::PlaybackController;
use crate::transport::Player;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "pushplay starting");

    // Load configuration
    let config = Config::load()?;
    info!(file = %config.audio_file.display(), "configuration loaded");

    // Claim the hardware. Any failure here is fatal.
    let gpio = rppal::gpio::Gpio::new().context("failed to open GPIO")?;

    let power_line =
        gpio::claim_output(&gpio, config.power_led_pin).context("power LED pin")?;
    let activity_line =
        gpio::claim_output(&gpio, config.activity_led_pin).context("activity LED pin")?;
    let start_pin =
        gpio::claim_input_pullup(&gpio, config.start_button_pin).context("start button pin")?;
    let stop_pin =
        gpio::claim_input_pullup(&gpio, config.stop_button_pin).context("stop button pin")?;

    let transport = Player::new().context("failed to open audio output")?;

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Channels for inter-component communication
    // Button listener -> playback controller
    let (button_tx, button_rx) = mpsc::channel(32);
    // Playback controller -> observers
    let (event_tx, mut event_rx) = broadcast::channel::<StateEvent>(64);

    // Power LED on for as long as the daemon lives
    let mut power = Indicator::new(power_line, "power", config.blink_period);
    power.on().await;

    let activity = Indicator::new(activity_line, "activity", config.blink_period);
    let mut controller = PlaybackController::new(
        config.audio_file.clone(),
        transport,
        activity,
        config.poll_interval,
        event_tx,
    );

    let mut buttons = ButtonListener::new(start_pin, stop_pin, config.debounce, button_tx);
    buttons.start().context("failed to start button listener")?;

    info!("daemon initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the playback controller (buttons + liveness poll)
        _ = controller.run(button_rx) => {
            info!("playback controller exited");
        }

        // Mirror transition events for observers
        _ = async {
            loop {
                match event_rx.recv().await {
                    Ok(event) => {
                        info!(%event, "state event");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "state event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("state event handler exited");
        }

        // Wait for shutdown signal
        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    // Teardown: stop the audio engine and release every line before
    // exiting with status 0.
    info!("shutting down...");

    buttons.stop();
    controller.shutdown().await;
    power.off().await;

    info!("pushplay stopped");

    Ok(())
}
