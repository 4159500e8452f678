//! Test doubles shared across the crate's test modules

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::gpio::OutputLine;
use crate::transport::{Transport, TransportError};

/// Output line that records every level written to it
pub struct MockLine {
    writes: Arc<Mutex<Vec<bool>>>,
}

impl MockLine {
    pub fn new() -> (Self, LineProbe) {
        let writes = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                writes: Arc::clone(&writes),
            },
            LineProbe { writes },
        )
    }
}

impl OutputLine for MockLine {
    fn set_level(&mut self, high: bool) {
        self.writes.lock().unwrap().push(high);
    }
}

/// Assertion handle onto a [`MockLine`]'s write history
pub struct LineProbe {
    writes: Arc<Mutex<Vec<bool>>>,
}

impl LineProbe {
    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.writes.lock().unwrap().last().copied()
    }
}

/// Scriptable transport that records the calls made on it.
///
/// Busy-ness follows play/pause/stop the way a real engine's would, and
/// tests can override it through the probe to simulate a track draining.
pub struct MockTransport {
    busy: Arc<AtomicBool>,
    fail_load: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockTransport {
    pub fn new() -> (Self, TransportProbe) {
        let busy = Arc::new(AtomicBool::new(false));
        let fail_load = Arc::new(AtomicBool::new(false));
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                busy: Arc::clone(&busy),
                fail_load: Arc::clone(&fail_load),
                calls: Arc::clone(&calls),
            },
            TransportProbe {
                busy,
                fail_load,
                calls,
            },
        )
    }
}

impl Transport for MockTransport {
    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push("load");
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(TransportError::Open {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Ok(())
    }

    fn play(&mut self) {
        self.calls.lock().unwrap().push("play");
        self.busy.store(true, Ordering::SeqCst);
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push("pause");
        self.busy.store(false, Ordering::SeqCst);
    }

    fn unpause(&mut self) {
        self.calls.lock().unwrap().push("unpause");
        self.busy.store(true, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push("stop");
        self.busy.store(false, Ordering::SeqCst);
    }

    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// Assertion and scripting handle onto a [`MockTransport`]
pub struct TransportProbe {
    busy: Arc<AtomicBool>,
    fail_load: Arc<AtomicBool>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl TransportProbe {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    pub fn fail_next_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }
}
