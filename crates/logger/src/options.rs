//! Logger configuration options

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::Level;
use crate::format::FormatFn;

/// Options controlling how structured values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Maximum nesting depth rendered before eliding with `..`;
    /// `None` renders unbounded.
    pub depth: Option<usize>,
    /// Pretty-print across multiple lines instead of one compact line.
    pub pretty: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            depth: Some(2),
            pretty: false,
        }
    }
}

impl InspectOptions {
    /// Options with no depth limit.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            depth: None,
            pretty: false,
        }
    }
}

/// Policy for records arriving through a foreign-framework bridge.
///
/// Applies only to bridged records; native logger instances are never
/// filtered by context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BridgeFilter {
    /// Forward every bridged record
    #[default]
    None,
    /// Suppress every bridged record
    All,
    /// Suppress bridged records whose context is in the set
    Contexts(HashSet<String>),
}

impl BridgeFilter {
    /// Whether a bridged record with this context should be suppressed.
    ///
    /// When the policy is [`BridgeFilter::All`] no set is consulted.
    #[must_use]
    pub fn ignores(&self, context: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Contexts(set) => set.contains(context),
        }
    }
}

/// Initial logger configuration, applied via
/// [`LoggerFactory::configure`](crate::LoggerFactory::configure).
///
/// Every field has a runtime setter on the factory; this struct only
/// gathers the values read once at startup.
#[derive(Clone, Default)]
pub struct LogOptions {
    /// Active minimum level
    pub level: Level,
    /// Disable ANSI color on the console channels
    pub no_color: bool,
    /// Value inspection options
    pub inspect: InspectOptions,
    /// Custom line formatter replacing the default format
    pub format_fn: Option<FormatFn>,
    /// File sink path; `None` leaves file logging detached
    pub file_path: Option<PathBuf>,
    /// Suppression policy for bridged records
    pub ignore_bridged: BridgeFilter,
}

impl LogOptions {
    /// Default options: level `log`, color on, depth 2, no file sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options sourced from the process environment.
    ///
    /// Recognized variables: `OPSDASH_LOG_LEVEL`, `NO_COLOR` (any
    /// non-empty value), `OPSDASH_LOG_DEPTH` (integer or `unbounded`),
    /// `OPSDASH_LOG_FILE`, and `OPSDASH_LOG_IGNORE_BRIDGED` (a boolean,
    /// `all`, or a comma-separated context list). Unparsable values
    /// fall back to the defaults; configuration must not crash the
    /// application.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();

        if let Some(value) = get("OPSDASH_LOG_LEVEL")
            && let Ok(level) = value.parse()
        {
            options.level = level;
        }

        if get("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            options.no_color = true;
        }

        if let Some(value) = get("OPSDASH_LOG_DEPTH") {
            if value.eq_ignore_ascii_case("unbounded") {
                options.inspect.depth = None;
            } else if let Ok(depth) = value.parse() {
                options.inspect.depth = Some(depth);
            }
        }

        if let Some(value) = get("OPSDASH_LOG_FILE")
            && !value.is_empty()
        {
            options.file_path = Some(PathBuf::from(value));
        }

        if let Some(value) = get("OPSDASH_LOG_IGNORE_BRIDGED") {
            if ["all", "true", "1"]
                .iter()
                .any(|name| value.eq_ignore_ascii_case(name))
            {
                options.ignore_bridged = BridgeFilter::All;
            } else if !["false", "0", "none", ""]
                .iter()
                .any(|name| value.eq_ignore_ascii_case(name))
            {
                let contexts: HashSet<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|context| !context.is_empty())
                    .map(String::from)
                    .collect();
                if !contexts.is_empty() {
                    options.ignore_bridged = BridgeFilter::Contexts(contexts);
                }
            }
        }

        options
    }

    /// Set the active minimum level.
    #[must_use]
    pub const fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Disable ANSI color on the console channels.
    #[must_use]
    pub const fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Set the value inspection options.
    #[must_use]
    pub const fn with_inspect(mut self, inspect: InspectOptions) -> Self {
        self.inspect = inspect;
        self
    }

    /// Install a custom line formatter.
    #[must_use]
    pub fn with_format_fn(
        mut self,
        format_fn: impl Fn(&crate::Record<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.format_fn = Some(std::sync::Arc::new(format_fn));
        self
    }

    /// Attach a file sink at this path.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set the suppression policy for bridged records.
    #[must_use]
    pub fn with_ignore_bridged(mut self, filter: BridgeFilter) -> Self {
        self.ignore_bridged = filter;
        self
    }
}

impl fmt::Debug for LogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogOptions")
            .field("level", &self.level)
            .field("no_color", &self.no_color)
            .field("inspect", &self.inspect)
            .field("format_fn", &self.format_fn.as_ref().map(|_| ".."))
            .field("file_path", &self.file_path)
            .field("ignore_bridged", &self.ignore_bridged)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn defaults() {
        let options = LogOptions::default();
        assert_eq!(options.level, Level::Log);
        assert!(!options.no_color);
        assert_eq!(options.inspect.depth, Some(2));
        assert!(options.file_path.is_none());
        assert_eq!(options.ignore_bridged, BridgeFilter::None);
    }

    #[test]
    fn reads_recognized_variables() {
        let options = LogOptions::from_lookup(lookup(&[
            ("OPSDASH_LOG_LEVEL", "verbose"),
            ("NO_COLOR", "1"),
            ("OPSDASH_LOG_DEPTH", "7"),
            ("OPSDASH_LOG_FILE", "/tmp/ops.log"),
            ("OPSDASH_LOG_IGNORE_BRIDGED", "hyper, rustls"),
        ]));

        assert_eq!(options.level, Level::Verbose);
        assert!(options.no_color);
        assert_eq!(options.inspect.depth, Some(7));
        assert_eq!(options.file_path.as_deref(), Some("/tmp/ops.log".as_ref()));
        assert!(options.ignore_bridged.ignores("hyper"));
        assert!(options.ignore_bridged.ignores("rustls"));
        assert!(!options.ignore_bridged.ignores("tokio"));
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let options = LogOptions::from_lookup(lookup(&[
            ("OPSDASH_LOG_LEVEL", "shout"),
            ("OPSDASH_LOG_DEPTH", "deep"),
            ("NO_COLOR", ""),
        ]));

        assert_eq!(options.level, Level::Log);
        assert_eq!(options.inspect.depth, Some(2));
        assert!(!options.no_color);
    }

    #[test]
    fn unbounded_depth_and_ignore_all() {
        let options = LogOptions::from_lookup(lookup(&[
            ("OPSDASH_LOG_DEPTH", "unbounded"),
            ("OPSDASH_LOG_IGNORE_BRIDGED", "all"),
        ]));

        assert_eq!(options.inspect.depth, None);
        assert_eq!(options.ignore_bridged, BridgeFilter::All);
        assert!(options.ignore_bridged.ignores("anything"));
    }

    #[test]
    fn ignore_bridged_accepts_boolean_spellings() {
        let on = LogOptions::from_lookup(lookup(&[("OPSDASH_LOG_IGNORE_BRIDGED", "true")]));
        assert_eq!(on.ignore_bridged, BridgeFilter::All);

        let off = LogOptions::from_lookup(lookup(&[("OPSDASH_LOG_IGNORE_BRIDGED", "false")]));
        assert_eq!(off.ignore_bridged, BridgeFilter::None);
    }

    #[test]
    fn bridge_filter_membership() {
        let filter = BridgeFilter::Contexts(
            ["Router".to_string(), "Mapper".to_string()].into_iter().collect(),
        );
        assert!(filter.ignores("Router"));
        assert!(!filter.ignores("router"));
        assert!(!BridgeFilter::None.ignores("Router"));
    }
}
