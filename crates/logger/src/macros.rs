//! Level-guarded logging macros
//!
//! Each macro has two forms: `info!("fmt {}", x)` emits through the
//! process-default factory with no context, and
//! `info!(logger, "fmt {}", x)` emits through a [`Logger`] instance.
//! Both check the active level before evaluating the format arguments,
//! so a filtered call never pays the formatting cost.
//!
//! [`Logger`]: crate::Logger

/// Log at error level.
///
/// ```
/// use opsdash_logger::{Logger, error};
///
/// error!("startup failed with code {}", 3);
///
/// let logger = Logger::new("Auth");
/// error!(logger, "token rejected for {}", "agent7");
/// ```
#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Error) {
            $crate::__private::emit($crate::Level::Error, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Error) {
            logger.error(::std::format!($($arg)+));
        }
    }};
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Warn) {
            $crate::__private::emit($crate::Level::Warn, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Warn) {
            logger.warn(::std::format!($($arg)+));
        }
    }};
}

/// Log at the default `log` level.
#[macro_export]
macro_rules! log {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Log) {
            $crate::__private::emit($crate::Level::Log, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Log) {
            logger.log(::std::format!($($arg)+));
        }
    }};
}

/// Log at the default `log` level (alias of [`log!`]).
#[macro_export]
macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Log) {
            $crate::__private::emit($crate::Level::Log, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Log) {
            logger.info(::std::format!($($arg)+));
        }
    }};
}

/// Log at debug level.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Debug) {
            $crate::__private::emit($crate::Level::Debug, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Debug) {
            logger.debug(::std::format!($($arg)+));
        }
    }};
}

/// Log at verbose level.
#[macro_export]
macro_rules! verbose {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        if $crate::__private::enabled($crate::Level::Verbose) {
            $crate::__private::emit($crate::Level::Verbose, &::std::format!($fmt $(, $arg)*));
        }
    }};
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.is_enabled($crate::Level::Verbose) {
            logger.verbose(::std::format!($($arg)+));
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::Level;
    use crate::logger::Logger;
    use crate::test_support::capture_factory;

    #[test]
    fn instance_macros_format_and_route() {
        let (factory, out, err) = capture_factory();
        factory.set_color(false);
        factory.set_level(Level::Verbose);
        let logger = Logger::with_factory("Macro", factory);

        crate::log!(logger, "count {}", 2);
        crate::info!(logger, "informed");
        crate::debug!(logger, "debugged");
        crate::verbose!(logger, "very {}", "verbose");
        crate::warn!(logger, "warned");
        crate::error!(logger, "failed {}", "hard");

        assert!(out.contains("[Macro] count 2"));
        assert!(out.contains("informed"));
        assert!(out.contains("debugged"));
        assert!(err.contains("warned"));
        assert!(err.contains("failed hard"));
    }

    #[test]
    fn arguments_are_not_evaluated_below_threshold() {
        let (factory, out, _err) = capture_factory();
        factory.set_level(Level::Error);
        let logger = Logger::with_factory("Macro", factory);

        let mut evaluated = false;
        crate::debug!(logger, "{}", {
            evaluated = true;
            "expensive"
        });

        assert!(!evaluated);
        assert!(out.contents().is_empty());
    }
}
