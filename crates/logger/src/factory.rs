//! The logger factory: shared channels, filters, and the file sink

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::Level;
use crate::channel::{Channel, ConsoleChannels};
use crate::error::Result;
use crate::file::FileSink;
use crate::format::{self, FormatFn};
use crate::logger::{Logger, LoggerInner};
use crate::options::{BridgeFilter, InspectOptions, LogOptions};
use crate::record::Record;

/// Owns the two console channels, the optional file sink, and every
/// setting logger instances resolve at call time.
///
/// Factories are explicitly constructed and shared as
/// `Arc<LoggerFactory>`; a process-lifetime default is available
/// through [`crate::factory`] for call sites that do not inject one.
/// All setters take `&self` and are safe to call concurrently with
/// emits: the level and color toggles are atomics, and the file-sink
/// slot is behind a mutex so a handle swap can never race an in-flight
/// write.
pub struct LoggerFactory {
    level: AtomicU8,
    color: AtomicBool,
    inspect: RwLock<InspectOptions>,
    format_fn: RwLock<Option<FormatFn>>,
    bridge_filter: RwLock<BridgeFilter>,
    channels: ConsoleChannels,
    file: Mutex<Option<FileSink>>,
    instances: Mutex<Vec<Weak<LoggerInner>>>,
}

impl LoggerFactory {
    /// A factory with default options, writing to the real
    /// stdout/stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::build(ConsoleChannels::stdio())
    }

    /// A factory writing to the given channel writers instead of the
    /// process console. Used by tests and by embedders that redirect
    /// output.
    #[must_use]
    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self::build(ConsoleChannels::from_writers(out, err))
    }

    fn build(channels: ConsoleChannels) -> Self {
        Self {
            level: AtomicU8::new(Level::default() as u8),
            color: AtomicBool::new(true),
            inspect: RwLock::new(InspectOptions::default()),
            format_fn: RwLock::new(None),
            bridge_filter: RwLock::new(BridgeFilter::None),
            channels,
            file: Mutex::new(None),
            instances: Mutex::new(Vec::new()),
        }
    }

    /// Apply a full set of options.
    ///
    /// Non-file settings are applied unconditionally; the file path is
    /// then attached (or detached, when `None`) exactly as
    /// [`set_file_path`](Self::set_file_path) would. A file error
    /// leaves the factory console-only and is returned to the caller;
    /// the other settings remain in effect.
    pub fn configure(&self, options: LogOptions) -> Result<()> {
        self.set_level(options.level);
        self.set_color(!options.no_color);
        self.set_inspect(options.inspect);
        if let Ok(mut format_fn) = self.format_fn.write() {
            *format_fn = options.format_fn;
        }
        self.set_bridge_filter(options.ignore_bridged);
        self.set_file_path(options.file_path)
    }

    /// The active minimum level.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_index(self.level.load(Ordering::Relaxed))
    }

    /// Set the active minimum level, visible to all instances on their
    /// next call.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether console lines are colored.
    #[must_use]
    pub fn color_enabled(&self) -> bool {
        self.color.load(Ordering::Relaxed)
    }

    /// Enable or disable console color.
    pub fn set_color(&self, enabled: bool) {
        self.color.store(enabled, Ordering::Relaxed);
    }

    /// The current inspect options.
    #[must_use]
    pub fn inspect(&self) -> InspectOptions {
        self.inspect
            .read()
            .map(|guard| *guard)
            .unwrap_or_default()
    }

    /// Replace the inspect options.
    pub fn set_inspect(&self, options: InspectOptions) {
        if let Ok(mut guard) = self.inspect.write() {
            *guard = options;
        }
    }

    /// Install a custom line formatter, replacing the default format
    /// for every instance without an override of its own.
    pub fn set_format_fn(
        &self,
        format_fn: impl Fn(&Record<'_>) -> String + Send + Sync + 'static,
    ) {
        if let Ok(mut guard) = self.format_fn.write() {
            *guard = Some(Arc::new(format_fn));
        }
    }

    /// Replace the suppression policy for bridged records.
    pub fn set_bridge_filter(&self, filter: BridgeFilter) {
        if let Ok(mut guard) = self.bridge_filter.write() {
            *guard = filter;
        }
    }

    /// Whether a message at this level passes the active threshold.
    /// Deterministic, no side effects.
    #[must_use]
    pub fn should_emit(&self, level: Level) -> bool {
        level <= self.level()
    }

    /// Whether a bridged record at this level and context passes both
    /// the threshold and the bridge ignore-filter.
    #[must_use]
    pub fn should_emit_bridged(&self, level: Level, context: &str) -> bool {
        self.should_emit(level)
            && self
                .bridge_filter
                .read()
                .map(|filter| !filter.ignores(context))
                .unwrap_or(true)
    }

    /// Attach, move, or detach the file sink.
    ///
    /// Setting the currently attached path is a no-op (one handle, one
    /// banner). Setting a new path closes the previous sink before
    /// opening the new one. `None` tears file logging down, draining
    /// the queue. On an open failure the factory is left console-only
    /// and the error is returned: emit paths never observe it.
    pub fn set_file_path(&self, path: Option<PathBuf>) -> Result<()> {
        let mut slot = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        match path {
            Some(path) => {
                if slot.as_ref().is_some_and(|sink| sink.path() == path.as_path()) {
                    return Ok(());
                }
                if let Some(previous) = slot.take() {
                    previous.close();
                }
                *slot = Some(FileSink::open(path)?);
                Ok(())
            }
            None => {
                if let Some(previous) = slot.take() {
                    previous.close();
                }
                Ok(())
            }
        }
    }

    /// The currently attached file path, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        let slot = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().map(|sink| sink.path().to_path_buf())
    }

    /// The live logger instances created against this factory.
    ///
    /// Registration happens in the instance constructors; the registry
    /// is for introspection and tests, never for dispatch.
    #[must_use]
    pub fn instances(&self) -> Vec<Logger> {
        let mut registry = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry.retain(|weak| weak.strong_count() > 0);
        registry
            .iter()
            .filter_map(Weak::upgrade)
            .map(Logger::from_inner)
            .collect()
    }

    pub(crate) fn register(&self, inner: &Arc<LoggerInner>) {
        let mut registry = self
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // a push that would reallocate first reclaims dead entries, so
        // churning short-lived instances never grows the registry
        if registry.len() == registry.capacity() {
            registry.retain(|weak| weak.strong_count() > 0);
        }
        registry.push(Arc::downgrade(inner));
    }

    /// Emit a record that arrived through a foreign-framework bridge.
    ///
    /// The bridge's target string acts as the context label and is
    /// subject to the bridge ignore-filter. Suppression is silent.
    pub fn emit_bridged(
        &self,
        level: Level,
        context: &str,
        message: &str,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if !self.should_emit_bridged(level, context) {
            return;
        }
        let mut record = Record::new(level, message);
        if !context.is_empty() {
            record = record.with_context(context);
        }
        if let (Some(file), Some(line)) = (file, line) {
            record = record.with_location(file, line);
        }
        self.dispatch(&record, None);
    }

    pub(crate) fn emit_plain(
        &self,
        level: Level,
        message: &str,
        file: &'static str,
        line: u32,
    ) {
        if !self.should_emit(level) {
            return;
        }
        let record = Record::new(level, message).with_location(file, line);
        self.dispatch(&record, None);
    }

    /// Render and fan out one record: format override, else the
    /// factory formatter, else the default format.
    pub(crate) fn dispatch(&self, record: &Record<'_>, format_override: Option<&FormatFn>) {
        let line = if let Some(format_fn) = format_override {
            format_fn(record)
        } else if let Some(format_fn) = self
            .format_fn
            .read()
            .ok()
            .and_then(|guard| (*guard).clone())
        {
            format_fn(record)
        } else {
            format::render(record, self.color_enabled())
        };
        self.write_line(record.level.channel(), &line);
    }

    /// Write one already-rendered line to a console channel and, when
    /// attached, the file sink.
    fn write_line(&self, channel: Channel, line: &str) {
        self.channels.write_line(channel, line);
        let slot = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sink) = slot.as_ref() {
            sink.enqueue(line);
        }
    }

    /// Flush both console channels and block until the file sink (if
    /// attached) has drained its queue. Intended for tests and
    /// shutdown; emits issued concurrently may briefly wait on the
    /// sink mutex.
    pub fn flush(&self) {
        self.channels.flush();
        let slot = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sink) = slot.as_ref() {
            sink.flush();
        }
    }

    /// Detach the file sink (draining it) and flush the console
    /// channels. Equivalent to the process-exit teardown.
    pub fn shutdown(&self) {
        let _ = self.set_file_path(None);
        self.channels.flush();
    }
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LoggerFactory {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("level", &self.level())
            .field("color", &self.color_enabled())
            .field("inspect", &self.inspect())
            .field("file_path", &self.file_path())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_factory;

    #[test]
    fn threshold_filtering_is_monotonic() {
        let factory = LoggerFactory::new();
        for (active_rank, active) in Level::ALL.into_iter().enumerate() {
            factory.set_level(active);
            for (rank, level) in Level::ALL.into_iter().enumerate() {
                assert_eq!(
                    factory.should_emit(level),
                    rank <= active_rank,
                    "active={active} level={level}"
                );
            }
        }
    }

    #[test]
    fn bridged_records_respect_the_ignore_filter() {
        let factory = LoggerFactory::new();
        factory.set_level(Level::Verbose);

        assert!(factory.should_emit_bridged(Level::Log, "Router"));

        factory.set_bridge_filter(BridgeFilter::Contexts(
            ["Router".to_string()].into_iter().collect(),
        ));
        assert!(!factory.should_emit_bridged(Level::Log, "Router"));
        assert!(factory.should_emit_bridged(Level::Log, "Mapper"));

        factory.set_bridge_filter(BridgeFilter::All);
        assert!(!factory.should_emit_bridged(Level::Error, "Mapper"));
    }

    #[test]
    fn configure_applies_every_setting() {
        let factory = LoggerFactory::new();
        factory
            .configure(
                LogOptions::new()
                    .with_level(Level::Debug)
                    .with_no_color(true)
                    .with_inspect(InspectOptions::unbounded()),
            )
            .unwrap();

        assert_eq!(factory.level(), Level::Debug);
        assert!(!factory.color_enabled());
        assert_eq!(factory.inspect(), InspectOptions::unbounded());
    }

    #[test]
    fn registry_reclaims_dead_entries_under_churn() {
        let factory = Arc::new(LoggerFactory::new());

        let held = Logger::with_factory("Kept", factory.clone());
        for index in 0..64 {
            let _ = Logger::with_factory(format!("Gone{index}"), factory.clone());
        }

        let registered = factory
            .instances
            .lock()
            .map(|registry| registry.len())
            .unwrap();
        assert!(registered < 64, "registry kept {registered} dead entries");

        let labels: Vec<String> = factory.instances().iter().map(Logger::context).collect();
        assert_eq!(labels, vec!["Kept".to_string()]);

        drop(held);
        assert!(factory.instances().is_empty());
    }

    #[test]
    fn bridged_emission_lands_on_the_level_channel() {
        let (factory, out, err) = capture_factory();
        factory.set_color(false);

        factory.emit_bridged(Level::Log, "Router", "mapped route", None, None);
        factory.emit_bridged(Level::Error, "Router", "route failed", None, None);

        assert!(out.contains("[Router] mapped route"));
        assert!(err.contains("[Router] route failed"));
        assert!(!out.contains("route failed"));
    }

    #[test]
    fn custom_format_fn_replaces_the_default() {
        let (factory, out, _err) = capture_factory();
        factory.set_format_fn(|record| format!("{}|{}", record.level, record.message));

        factory.emit_bridged(Level::Log, "", "short", None, None);

        assert_eq!(out.lines(), vec!["log|short".to_string()]);
    }
}
