//! Single status LED with optional blinking

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::info;

use crate::gpio::OutputLine;

use super::Blinker;

/// One status LED.
///
/// The line is shared with the blink task behind a mutex; every other
/// mutation happens on the owner's task, so `on`/`off`/`blink` are never
/// invoked concurrently. Solid writes always stop an active blinker
/// first and wait for it to exit, which is what makes the line level
/// deterministic after these calls return.
pub struct Indicator<L: OutputLine> {
    name: &'static str,
    line: Arc<Mutex<L>>,
    blink_period: Duration,
    blinker: Option<Blinker>,
}

impl<L: OutputLine> Indicator<L> {
    pub fn new(line: L, name: &'static str, blink_period: Duration) -> Self {
        Self {
            name,
            line: Arc::new(Mutex::new(line)),
            blink_period,
            blinker: None,
        }
    }

    /// Stop any blinking and drive the line high.
    pub async fn on(&mut self) {
        info!(indicator = self.name, "on");
        self.stop_blinker().await;
        self.set_level(true);
    }

    /// Stop any blinking and drive the line low.
    pub async fn off(&mut self) {
        info!(indicator = self.name, "off");
        self.stop_blinker().await;
        self.set_level(false);
    }

    /// Start or stop blinking. Requesting the current mode is a no-op.
    pub async fn blink(&mut self, enable: bool) {
        if enable && self.blinker.is_none() {
            info!(indicator = self.name, "blink on");
            self.blinker = Some(Blinker::spawn(
                Arc::clone(&self.line),
                self.blink_period,
            ));
        } else if !enable && self.blinker.is_some() {
            info!(indicator = self.name, "blink off");
            self.stop_blinker().await;
        }
    }

    /// Whether a blink task is currently live
    pub fn is_blinking(&self) -> bool {
        self.blinker.is_some()
    }

    async fn stop_blinker(&mut self) {
        if let Some(blinker) = self.blinker.take() {
            blinker.stop().await;
        }
    }

    fn set_level(&self, high: bool) {
        self.line
            .lock()
            .expect("indicator line lock poisoned")
            .set_level(high);
    }
}
