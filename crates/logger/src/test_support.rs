//! Test support utilities
//!
//! Capture writers stand in for the process stdout/stderr so tests can
//! assert on exactly what a factory wrote to each channel.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::LoggerFactory;

/// An in-memory channel writer.
///
/// Clones share the same buffer: hand one clone to
/// [`LoggerFactory::with_writers`] and keep another for assertions.
#[derive(Clone, Debug, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    /// Create an empty capture writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// The captured output split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    /// Whether the captured output contains the given text.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.buffer.lock().unwrap().clear();
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A factory wired to two capture writers instead of the real console.
///
/// Returns the factory plus the stdout-channel and stderr-channel
/// captures, in that order.
#[must_use]
pub fn capture_factory() -> (Arc<LoggerFactory>, CaptureWriter, CaptureWriter) {
    let out = CaptureWriter::new();
    let err = CaptureWriter::new();
    let factory = Arc::new(LoggerFactory::with_writers(
        Box::new(out.clone()),
        Box::new(err.clone()),
    ));
    (factory, out, err)
}
