//! Severity levels and their display aliases

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::error::Error;

/// Log severity, ordered from most to least severe.
///
/// The derived ordering follows the declaration order, so
/// `Level::Error < Level::Warn < .. < Level::Verbose`. A message passes
/// the threshold when its level is less than or equal to the active
/// level: an active level of [`Level::Warn`] emits `error` and `warn`
/// lines and filters everything else.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Error level
    Error,
    /// Warn level
    Warn,
    /// Log level (the `info` alias resolves here)
    #[default]
    Log,
    /// Debug level
    Debug,
    /// Verbose level
    Verbose,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Self; 5] = [
        Self::Error,
        Self::Warn,
        Self::Log,
        Self::Debug,
        Self::Verbose,
    ];

    /// The fixed-width four character tag shown between brackets at the
    /// start of a formatted line.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Error => "ERR ",
            Self::Warn => "WARN",
            Self::Log => "INFO",
            Self::Debug => "DEBG",
            Self::Verbose => "VERB",
        }
    }

    /// The console channel lines at this level are written to.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::Error | Self::Warn => Channel::Err,
            Self::Log | Self::Debug | Self::Verbose => Channel::Out,
        }
    }

    /// Recover a level from its rank, for atomic storage.
    pub(crate) const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Log,
            3 => Self::Debug,
            _ => Self::Verbose,
        }
    }

    /// The configuration name of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Log => "log",
            Self::Debug => "debug",
            Self::Verbose => "verbose",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    /// Parses a level name, case-insensitively. `info` is accepted as
    /// an alias of `log`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "log" | "info" => Ok(Self::Log),
            "debug" => Ok(Self::Debug),
            "verbose" => Ok(Self::Verbose),
            other => Err(Error::Configuration(format!("unknown level: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_most_severe_first() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Log);
        assert!(Level::Log < Level::Debug);
        assert!(Level::Debug < Level::Verbose);
    }

    #[test]
    fn tags_are_four_characters() {
        for level in Level::ALL {
            assert_eq!(level.tag().len(), 4, "{level} tag width");
        }
        assert_eq!(Level::Error.tag(), "ERR ");
        assert_eq!(Level::Log.tag(), "INFO");
    }

    #[test]
    fn warn_and_error_route_to_stderr() {
        assert_eq!(Level::Error.channel(), Channel::Err);
        assert_eq!(Level::Warn.channel(), Channel::Err);
        assert_eq!(Level::Log.channel(), Channel::Out);
        assert_eq!(Level::Debug.channel(), Channel::Out);
        assert_eq!(Level::Verbose.channel(), Channel::Out);
    }

    #[test]
    fn parses_names_and_info_alias() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("log".parse::<Level>().unwrap(), Level::Log);
        assert_eq!("info".parse::<Level>().unwrap(), Level::Log);
        assert_eq!("verbose".parse::<Level>().unwrap(), Level::Verbose);
        assert!("trace".parse::<Level>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>().unwrap(), level);
        }
    }
}
