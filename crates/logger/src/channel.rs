//! Console output channels

use std::io::{self, Write};
use std::sync::Mutex;

/// The console stream a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Process stdout, for log/info/debug/verbose lines
    Out,
    /// Process stderr, for warn/error lines
    Err,
}

/// The two long-lived console writers shared by every logger instance.
///
/// Writers default to the real process stdout/stderr and can be swapped
/// for in-memory buffers by tests and embedders. Each lock is held for
/// a single line at a time to prevent interleaving.
pub(crate) struct ConsoleChannels {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleChannels {
    pub(crate) fn stdio() -> Self {
        Self {
            out: Mutex::new(Box::new(io::stdout())),
            err: Mutex::new(Box::new(io::stderr())),
        }
    }

    pub(crate) fn from_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Write one line, appending the trailing newline. Writer errors
    /// are swallowed: the emit path never fails.
    pub(crate) fn write_line(&self, channel: Channel, line: &str) {
        let writer = match channel {
            Channel::Out => &self.out,
            Channel::Err => &self.err,
        };
        if let Ok(mut writer) = writer.lock() {
            let _ = writer.write_all(line.as_bytes());
            let _ = writer.write_all(b"\n");
            let _ = writer.flush();
        }
    }

    pub(crate) fn flush(&self) {
        for writer in [&self.out, &self.err] {
            if let Ok(mut writer) = writer.lock() {
                let _ = writer.flush();
            }
        }
    }
}
