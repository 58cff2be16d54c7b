//! Bridge from the `log` crate

use std::sync::Arc;

use log::{Log, Metadata, Record as LogRecord};

use crate::{Level, LoggerFactory};

/// Forwards `log` crate records into a [`LoggerFactory`].
///
/// The record's target acts as the context label and is subject to the
/// factory's bridge ignore-filter.
pub struct LogBridge {
    factory: Arc<LoggerFactory>,
}

impl LogBridge {
    /// Create a new log bridge
    #[must_use]
    pub fn new(factory: Arc<LoggerFactory>) -> Self {
        Self { factory }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.factory
            .should_emit_bridged(map_level(metadata.level()), metadata.target())
    }

    fn log(&self, record: &LogRecord<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        self.factory.emit_bridged(
            map_level(record.level()),
            record.target(),
            &record.args().to_string(),
            record.file_static(),
            record.line(),
        );
    }

    fn flush(&self) {
        self.factory.flush();
    }
}

/// Map log levels to our levels
const fn map_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Log,
        log::Level::Debug => Level::Debug,
        log::Level::Trace => Level::Verbose,
    }
}

/// Route all `log` crate macros through the given factory.
///
/// The max level is left fully open so runtime
/// [`set_level`](LoggerFactory::set_level) changes stay visible; the
/// bridge's `enabled` check does the actual filtering.
///
/// # Example
/// ```no_run
/// use opsdash_logger::compat::log_bridge::init_log_bridge;
///
/// init_log_bridge(opsdash_logger::factory()).expect("log bridge already set");
/// log::info!("now flows through the shared channels");
/// ```
///
/// # Errors
///
/// Returns the `log` crate's error when a global logger is already
/// installed.
pub fn init_log_bridge(factory: Arc<LoggerFactory>) -> Result<(), log::SetLoggerError> {
    // log::set_logger requires 'static
    let bridge = Box::leak(Box::new(LogBridge::new(factory)));
    log::set_logger(bridge)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
