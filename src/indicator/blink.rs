//! Cancellable periodic line toggler

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::gpio::OutputLine;

/// Background task that toggles an output line at a fixed period.
///
/// Spawned only by [`Indicator`](super::Indicator), which guarantees at
/// most one live blinker per line. `stop()` cancels the task and waits
/// for it to exit, so once it returns no further toggle can land on the
/// line.
pub struct Blinker {
    stop_tx: watch::Sender<()>,
    handle: JoinHandle<()>,
}

impl Blinker {
    /// Spawn the toggling loop. The first edge drives the line low.
    pub fn spawn<L: OutputLine>(line: Arc<Mutex<L>>, period: Duration) -> Self {
        let (stop_tx, mut stop_rx) = watch::channel(());

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut level = true;

            loop {
                tokio::select! {
                    // Poll cancellation first so a stop racing a tick
                    // never produces an extra toggle.
                    biased;

                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        level = !level;
                        line.lock().expect("indicator line lock poisoned").set_level(level);
                    }
                }
            }
        });

        Self { stop_tx, handle }
    }

    /// Cancel the toggling loop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.handle.await {
            warn!(?e, "blink task did not exit cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLine;

    #[tokio::test(start_paused = true)]
    async fn test_toggles_on_period() {
        let (line, probe) = MockLine::new();
        let blinker = Blinker::spawn(Arc::new(Mutex::new(line)), Duration::from_millis(500));

        // First edge fires immediately, then one per period.
        time::sleep(Duration::from_millis(1250)).await;
        assert_eq!(probe.writes(), vec![false, true, false]);

        blinker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_edge_drives_low() {
        let (line, probe) = MockLine::new();
        let blinker = Blinker::spawn(Arc::new(Mutex::new(line)), Duration::from_millis(500));

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(probe.writes(), vec![false]);

        blinker.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_toggle_after_stop_returns() {
        let (line, probe) = MockLine::new();
        let blinker = Blinker::spawn(Arc::new(Mutex::new(line)), Duration::from_millis(500));

        time::sleep(Duration::from_millis(600)).await;
        blinker.stop().await;
        let toggles = probe.writes().len();

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(probe.writes().len(), toggles);
    }
}
