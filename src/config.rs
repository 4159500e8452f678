//! Configuration loading and management
//!
//! There is no configuration file; this appliance has one fixed behavior.
//! The operating parameters live here as documented defaults, with the
//! audio file path overridable from the environment for installs that
//! keep the track somewhere else.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

/// Environment variable overriding the audio file path.
pub const AUDIO_FILE_ENV: &str = "PUSHPLAY_AUDIO_FILE";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the single track this appliance plays
    pub audio_file: PathBuf,

    /// Physical (BOARD) pin of the green power LED, solid on while the
    /// daemon runs
    pub power_led_pin: u8,

    /// Physical (BOARD) pin of the yellow activity LED driven by the
    /// playback controller
    pub activity_led_pin: u8,

    /// Physical (BOARD) pin of the start/pause button
    pub start_button_pin: u8,

    /// Physical (BOARD) pin of the stop button
    pub stop_button_pin: u8,

    /// Window within which repeated edges from one physical press are
    /// suppressed
    pub debounce: Duration,

    /// Toggle period of a blinking indicator
    pub blink_period: Duration,

    /// Cadence of the end-of-track liveness poll
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_file: PathBuf::from("/home/pi/music/track.mp3"),
            power_led_pin: 22,
            activity_led_pin: 24,
            start_button_pin: 16,
            stop_button_pin: 18,
            debounce: Duration::from_millis(500),
            blink_period: Duration::from_millis(500),
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl Config {
    /// Load configuration from defaults and environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(AUDIO_FILE_ENV) {
            config.audio_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.power_led_pin, 22);
        assert_eq!(config.activity_led_pin, 24);
        assert_eq!(config.start_button_pin, 16);
        assert_eq!(config.stop_button_pin, 18);
        assert_eq!(config.debounce, Duration::from_millis(500));
        assert_eq!(config.blink_period, Duration::from_millis(500));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_load_keeps_default_pins() {
        let config = Config::load().unwrap();
        assert_eq!(config.power_led_pin, Config::default().power_led_pin);
        assert_eq!(config.stop_button_pin, Config::default().stop_button_pin);
    }
}
