//! Forwards `tracing` events into an opsdash logger factory so
//! instrumented dependencies share the dashboard's console and file
//! channels.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use crate::error::{Error, Result};

use std::fmt::Write as _;
use std::sync::Arc;

use opsdash_logger::{Level, LoggerFactory};
use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// A `tracing` layer that forwards events to a [`LoggerFactory`].
///
/// The event target becomes the context label, with the names of any
/// enclosing spans appended, so `connect` inside a `handshake` span of
/// module `gateway::ws` renders as `[gateway::ws.handshake]`. Bridged
/// events pass through the factory's level threshold and ignore filter
/// on every event, so runtime reconfiguration applies immediately.
pub struct TracingBridge {
    factory: Arc<LoggerFactory>,
}

impl TracingBridge {
    /// Create a layer forwarding to `factory`.
    #[must_use]
    pub const fn new(factory: Arc<LoggerFactory>) -> Self {
        Self { factory }
    }
}

impl<S> Layer<S> for TracingBridge
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = map_level(*metadata.level());
        if !self.factory.should_emit_bridged(level, metadata.target()) {
            return;
        }

        let mut context = metadata.target().to_string();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                context.push('.');
                context.push_str(span.name());
            }
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.factory.emit_bridged(
            level,
            &context,
            &visitor.message,
            metadata.file(),
            metadata.line(),
        );
    }
}

fn map_level(level: tracing::Level) -> Level {
    match level {
        tracing::Level::ERROR => Level::Error,
        tracing::Level::WARN => Level::Warn,
        tracing::Level::INFO => Level::Log,
        tracing::Level::DEBUG => Level::Debug,
        tracing::Level::TRACE => Level::Verbose,
    }
}

/// Collects the `message` field plus any other fields as `key=value`
/// pairs. The macros visit the message first, so pairs trail it.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn push_pair(&mut self, field: &tracing::field::Field, value: std::fmt::Arguments<'_>) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        let _ = write!(self.message, "{}={value}", field.name());
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_pair(field, format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_pair(field, format_args!("{value:?}"));
        }
    }
}

/// Install a process-global `tracing` subscriber that forwards every
/// event to `factory`.
///
/// # Errors
///
/// Returns an error if another global subscriber is already installed.
pub fn init_tracing_bridge(factory: Arc<LoggerFactory>) -> Result<()> {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(TracingBridge::new(factory))
        .try_init()?;

    Ok(())
}
