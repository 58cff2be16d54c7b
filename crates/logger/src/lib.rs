//! Structured logging for the opsdash services
//!
//! A [`LoggerFactory`] owns two console channels (stdout for
//! log/info/debug/verbose, stderr for warn/error), an optional
//! ANSI-stripped file sink, and the active minimum level. Named
//! [`Logger`] instances are cheap handles that resolve the level,
//! format, and inspect options from their factory at call time:
//! - Runtime reconfiguration visible to every instance immediately
//! - One-shot context refinement: [`Logger::at`],
//!   [`Logger::sub_context`], [`Logger::split_lines`]
//! - File mirroring through a bounded queue that never blocks the
//!   caller
//! - Optional `log` crate bridge (feature `log-compat`)
//!
//! ```
//! use opsdash_logger::{Level, LogOptions, Logger};
//!
//! opsdash_logger::init(LogOptions::new().with_level(Level::Debug))?;
//!
//! let logger = Logger::new("Auth");
//! logger.log("session opened");
//! logger.at("login").warn("bad password");
//! # Ok::<(), opsdash_logger::Error>(())
//! ```

#![warn(missing_docs, unreachable_pub)]
#![forbid(unsafe_code)]

mod channel;
pub mod compat;
mod error;
mod factory;
mod file;
pub mod format;
pub mod inspect;
mod level;
mod logger;
mod macros;
mod options;
mod record;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use channel::Channel;
pub use error::{Error, Result};
pub use factory::LoggerFactory;
pub use format::FormatFn;
pub use level::Level;
pub use logger::Logger;
pub use options::{BridgeFilter, InspectOptions, LogOptions};
pub use record::Record;

use std::sync::{Arc, OnceLock};

static DEFAULT_FACTORY: OnceLock<Arc<LoggerFactory>> = OnceLock::new();

/// The process-lifetime default factory, constructed lazily with
/// default options on first use.
///
/// Prefer constructing and injecting a factory where practical; this
/// accessor exists for convenience call sites and the crate macros.
#[must_use]
pub fn factory() -> Arc<LoggerFactory> {
    DEFAULT_FACTORY
        .get_or_init(|| Arc::new(LoggerFactory::new()))
        .clone()
}

/// Configure the process-default factory.
///
/// # Errors
///
/// Returns a configuration error when a requested file sink cannot be
/// opened; the factory stays usable, console-only.
pub fn init(options: LogOptions) -> Result<()> {
    factory().configure(options)
}

/// Flush the process-default factory's channels and file sink, if it
/// was ever constructed.
pub fn flush() {
    if let Some(factory) = DEFAULT_FACTORY.get() {
        factory.flush();
    }
}

/// Tear down the process-default factory's file sink and flush the
/// console channels. Call before process exit when a file sink is
/// attached; the default factory is never dropped, so this is its exit
/// hook.
pub fn shutdown() {
    if let Some(factory) = DEFAULT_FACTORY.get() {
        factory.shutdown();
    }
}

#[doc(hidden)]
pub mod __private {
    use crate::Level;

    #[inline]
    #[must_use]
    pub fn enabled(level: Level) -> bool {
        crate::factory().should_emit(level)
    }

    #[track_caller]
    pub fn emit(level: Level, message: &str) {
        let location = std::panic::Location::caller();
        crate::factory().emit_plain(level, message, location.file(), location.line());
    }
}
