//! Line formatting

use std::sync::Arc;

use console::Style;

use crate::{Level, Record};

/// A custom line formatter.
///
/// Replaces the default format entirely; the returned string is written
/// as-is to the console channel (plus the file sink, ANSI-stripped), so
/// a custom formatter does its own styling if it wants any.
pub type FormatFn = Arc<dyn Fn(&Record<'_>) -> String + Send + Sync>;

/// Timestamp format used by the default line format and the file
/// banner, e.g. `8/25/2026, 9:41:07 AM`.
pub(crate) const TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Render a record in the default format:
/// `[<TAG>] <timestamp> - [<context>] <message>`, the context bracket
/// omitted when the record has none. With `color` the whole line is
/// styled in the level's color; styling is forced so pipes and files
/// see the same bytes as a terminal.
#[must_use]
pub fn render(record: &Record<'_>, color: bool) -> String {
    let timestamp = record.timestamp.format(TIMESTAMP_FORMAT);
    let line = match &record.context {
        Some(context) => format!(
            "[{}] {} - [{}] {}",
            record.level.tag(),
            timestamp,
            context,
            record.message
        ),
        None => format!("[{}] {} - {}", record.level.tag(), timestamp, record.message),
    };

    if color {
        level_style(record.level).apply_to(line).to_string()
    } else {
        line
    }
}

/// Render a record as a single JSON object, RFC 3339 timestamp, no
/// styling. Suitable as a [`FormatFn`] for log shippers.
#[must_use]
pub fn json_lines(record: &Record<'_>) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| render(record, false))
}

fn level_style(level: Level) -> Style {
    let style = match level {
        Level::Error => Style::new().red(),
        Level::Warn => Style::new().yellow(),
        Level::Log => Style::new().green(),
        Level::Debug => Style::new().blue(),
        Level::Verbose => Style::new().magenta(),
    };
    style.force_styling(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(level: Level, context: Option<&'static str>, message: &'static str) -> Record<'static> {
        let record = Record::new(level, message);
        match context {
            Some(context) => record.with_context(context),
            None => record,
        }
    }

    #[test]
    fn default_format_with_context() {
        let line = render(&record(Level::Log, Some("Auth"), "hello"), false);
        assert!(line.starts_with("[INFO] "));
        assert!(line.contains(" - [Auth] hello"));
    }

    #[test]
    fn context_bracket_omitted_when_unset() {
        let line = render(&record(Level::Debug, None, "bare"), false);
        assert!(line.starts_with("[DEBG] "));
        let (_, rest) = line.split_once(" - ").unwrap();
        assert_eq!(rest, "bare");
    }

    #[test]
    fn timestamp_is_locale_style() {
        let mut record = record(Level::Log, None, "tick");
        record.timestamp = chrono::Local.with_ymd_and_hms(2026, 8, 25, 9, 41, 7).unwrap();
        let line = render(&record, false);
        assert_eq!(line, "[INFO] 8/25/2026, 9:41:07 AM - tick");
    }

    #[test]
    fn color_wraps_the_line_in_escapes() {
        let plain = render(&record(Level::Error, Some("Auth"), "boom"), false);
        let colored = render(&record(Level::Error, Some("Auth"), "boom"), true);

        assert!(!plain.contains('\x1b'));
        assert!(colored.contains('\x1b'));
    }

    #[test]
    fn stripping_colored_output_recovers_the_plain_line() {
        let mut warn = record(Level::Warn, Some("Sto"), "region offline");
        warn.timestamp = chrono::Local.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap();

        let plain = render(&warn, false);
        let stripped = strip_ansi_escapes::strip(render(&warn, true));
        assert_eq!(stripped, plain.as_bytes());
    }

    #[test]
    fn json_lines_parse_back() {
        let line = json_lines(&record(Level::Error, Some("Auth"), "boom"));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["context"], "Auth");
        assert_eq!(value["message"], "boom");
    }
}
