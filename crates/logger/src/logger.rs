//! Named logger instances

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Local;
use serde::Serialize;

use crate::Level;
use crate::factory::LoggerFactory;
use crate::format::FormatFn;
use crate::inspect;
use crate::options::InspectOptions;
use crate::record::Record;

/// A named, cheaply cloneable logging handle bound to a factory.
///
/// Create one per logical module and keep it for the owner's lifetime.
/// Every call resolves the active level, format, and inspect options
/// from the factory at that moment; nothing is cached on the instance.
/// Clones share the context label and the one-shot flags.
///
/// ```
/// use opsdash_logger::Logger;
///
/// let logger = Logger::new("Auth");
/// logger.log("session opened");
/// logger.at("login").warn("bad password");
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

pub(crate) struct LoggerInner {
    factory: Arc<LoggerFactory>,
    context: RwLock<String>,
    inspect_override: RwLock<Option<InspectOptions>>,
    format_override: RwLock<Option<FormatFn>>,
    one_shot: Mutex<OneShot>,
}

/// Flags armed for exactly the next written line. Filtered calls leave
/// them armed; they reset only after a line is actually emitted.
#[derive(Default)]
struct OneShot {
    at: Option<String>,
    sub: Option<String>,
    split: bool,
}

impl Logger {
    /// A logger on the process-default factory.
    #[must_use]
    pub fn new(context: impl Into<String>) -> Self {
        Self::with_factory(context, crate::factory())
    }

    /// A logger on an explicitly injected factory.
    #[must_use]
    pub fn with_factory(context: impl Into<String>, factory: Arc<LoggerFactory>) -> Self {
        let inner = Arc::new(LoggerInner {
            factory,
            context: RwLock::new(context.into()),
            inspect_override: RwLock::new(None),
            format_override: RwLock::new(None),
            one_shot: Mutex::new(OneShot::default()),
        });
        inner.factory.register(&inner);
        Self { inner }
    }

    /// A logger labeled with a type's name (its last path segment).
    #[must_use]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(type_tail(std::any::type_name::<T>()))
    }

    /// Construction-time inspect override.
    #[must_use]
    pub fn with_inspect(self, options: InspectOptions) -> Self {
        self.set_inspect(options);
        self
    }

    /// Construction-time format override.
    #[must_use]
    pub fn with_format_fn(
        self,
        format_fn: impl Fn(&Record<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.set_format_fn(format_fn);
        self
    }

    pub(crate) fn from_inner(inner: Arc<LoggerInner>) -> Self {
        Self { inner }
    }

    /// The factory this instance emits through.
    #[must_use]
    pub fn factory(&self) -> &Arc<LoggerFactory> {
        &self.inner.factory
    }

    /// The current context label. Empty means no context bracket.
    #[must_use]
    pub fn context(&self) -> String {
        self.inner
            .context
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Permanently rebind the context label.
    pub fn set_context(&self, context: impl Into<String>) {
        if let Ok(mut guard) = self.inner.context.write() {
            *guard = context.into();
        }
    }

    /// Rebind the context label to a type's name.
    pub fn set_context_of<T: ?Sized>(&self) {
        self.set_context(type_tail(std::any::type_name::<T>()));
    }

    /// Override the factory's inspect options for this instance.
    pub fn set_inspect(&self, options: InspectOptions) {
        if let Ok(mut guard) = self.inner.inspect_override.write() {
            *guard = Some(options);
        }
    }

    /// Override the factory's line format for this instance.
    pub fn set_format_fn(
        &self,
        format_fn: impl Fn(&Record<'_>) -> String + Send + Sync + 'static,
    ) {
        if let Ok(mut guard) = self.inner.format_override.write() {
            *guard = Some(Arc::new(format_fn));
        }
    }

    /// Whether a message at this level would currently be emitted.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.inner.factory.should_emit(level)
    }

    /// Label the next written line with a method name:
    /// `logger.at("login").warn(..)` emits context `<label>.login`.
    /// One-shot; honored at every level.
    pub fn at(&self, method: impl Into<String>) -> &Self {
        self.one_shot_mut(|flags| flags.at = Some(method.into()));
        self
    }

    /// Append a one-shot sub-context to the next written line:
    /// context becomes `<context>.<sub>`.
    pub fn sub_context(&self, sub: impl Into<String>) -> &Self {
        self.one_shot_mut(|flags| flags.sub = Some(sub.into()));
        self
    }

    /// Emit the next written message as one formatted line per
    /// `'\n'`-separated segment instead of a single multi-line write.
    /// Empty segments are kept: a trailing newline yields one more
    /// formatted line. One-shot.
    pub fn split_lines(&self) -> &Self {
        self.one_shot_mut(|flags| flags.split = true);
        self
    }

    /// Log at error level (stderr channel).
    #[track_caller]
    pub fn error(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Error, message.into(), Location::caller());
    }

    /// Log at warn level (stderr channel).
    #[track_caller]
    pub fn warn(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Warn, message.into(), Location::caller());
    }

    /// Log at the default `log` level.
    #[track_caller]
    pub fn log(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Log, message.into(), Location::caller());
    }

    /// Alias of [`log`](Self::log): same rank, same `INFO` tag.
    #[track_caller]
    pub fn info(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Log, message.into(), Location::caller());
    }

    /// Log at debug level.
    #[track_caller]
    pub fn debug(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Debug, message.into(), Location::caller());
    }

    /// Log at verbose level.
    #[track_caller]
    pub fn verbose(&self, message: impl Into<Cow<'static, str>>) {
        self.emit(Level::Verbose, message.into(), Location::caller());
    }

    /// Log a message followed by a structured value, rendered with the
    /// instance's inspect options (else the factory's). A value that
    /// cannot be serialized renders as `"<unformattable>"`.
    #[track_caller]
    pub fn inspect<T>(&self, level: Level, message: impl Into<Cow<'static, str>>, value: &T)
    where
        T: Serialize + ?Sized,
    {
        if !self.is_enabled(level) {
            return;
        }
        let options = self
            .inner
            .inspect_override
            .read()
            .ok()
            .and_then(|guard| *guard)
            .unwrap_or_else(|| self.inner.factory.inspect());
        let message = message.into();
        let rendered = inspect::render(value, &options);
        let combined = if message.is_empty() {
            rendered
        } else {
            format!("{message} {rendered}")
        };
        self.emit(level, combined.into(), Location::caller());
    }

    /// The single emit path behind every level method.
    ///
    /// Filtered calls return before any formatting and leave the
    /// one-shot flags armed; flags reset only once a line is written.
    fn emit(&self, level: Level, message: Cow<'static, str>, location: &'static Location<'static>) {
        let factory = &self.inner.factory;
        if !factory.should_emit(level) {
            return;
        }

        let one_shot = {
            let mut guard = self
                .inner
                .one_shot
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };

        let context = self.resolve_context(level, &one_shot, location);
        let format_override = self
            .inner
            .format_override
            .read()
            .ok()
            .and_then(|guard| (*guard).clone());
        let timestamp = Local::now();

        if one_shot.split {
            // split('\n'), not lines(): empty and trailing segments
            // still produce a formatted line each
            for piece in message.split('\n') {
                let record = Record {
                    level,
                    timestamp,
                    context: context.as_deref().map(Cow::Borrowed),
                    message: Cow::Borrowed(piece),
                    file: Some(location.file()),
                    line: Some(location.line()),
                };
                factory.dispatch(&record, format_override.as_ref());
            }
        } else {
            let record = Record {
                level,
                timestamp,
                context: context.as_deref().map(Cow::Borrowed),
                message,
                file: Some(location.file()),
                line: Some(location.line()),
            };
            factory.dispatch(&record, format_override.as_ref());
        }
    }

    /// Context for one written line: the label, refined for warn/error
    /// with the `at` label (any level) or the call site, then the
    /// one-shot sub-context.
    fn resolve_context(
        &self,
        level: Level,
        one_shot: &OneShot,
        location: &'static Location<'static>,
    ) -> Option<String> {
        let mut context = self.context();

        if let Some(at) = &one_shot.at {
            if context.is_empty() {
                context = at.clone();
            } else {
                context = format!("{context}.{at}");
            }
        } else if matches!(level, Level::Error | Level::Warn) && !context.is_empty() {
            let file = Path::new(location.file())
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(location.file());
            context = format!("{context}.{file}:{}", location.line());
        }

        if let Some(sub) = &one_shot.sub {
            if context.is_empty() {
                context = sub.clone();
            } else {
                context = format!("{context}.{sub}");
            }
        }

        if context.is_empty() { None } else { Some(context) }
    }

    fn one_shot_mut(&self, apply: impl FnOnce(&mut OneShot)) {
        let mut guard = self
            .inner
            .one_shot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("context", &self.context())
            .finish_non_exhaustive()
    }
}

fn type_tail(name: &str) -> &str {
    // generic arguments carry their own paths; cut them before taking
    // the last segment so `Vec<String>` tails to `Vec`
    let base = &name[..name.find('<').unwrap_or(name.len())];
    match base.rsplit_once("::") {
        Some((_, tail)) => tail,
        None => base,
    }
}
