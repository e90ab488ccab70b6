//! Capture of structured log output for assertions.

use parking_lot::Mutex;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Level;

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// JSON log lines written while the capture guard is alive
#[derive(Clone)]
pub struct CapturedLogs {
    buffer: LogBuffer,
}

impl CapturedLogs {
    /// Every captured event as parsed JSON
    pub fn events(&self) -> Vec<Value> {
        let bytes = self.buffer.0.lock().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// `(store, operation)` pairs of recorded store measurements, in order
    pub fn store_operations(&self) -> Vec<(String, String)> {
        self.events()
            .iter()
            .filter_map(|event| {
                let fields = event.get("fields")?;
                let store = fields.get("store")?.as_str()?;
                let operation = fields.get("operation")?.as_str()?;
                Some((store.to_string(), operation.to_string()))
            })
            .collect()
    }
}

/// Route this thread's tracing events into a buffer until the guard drops.
///
/// Use from a current-thread runtime so async work stays on this thread.
pub fn capture_logs() -> (DefaultGuard, CapturedLogs) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (guard, CapturedLogs { buffer })
}
