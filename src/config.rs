use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::fmt::Write;

/// Default key name for the entry's timestamp.
pub const DEFAULT_TIME_KEY: &str = "timestamp";
/// Default key name for the entry's level.
pub const DEFAULT_LEVEL_KEY: &str = "level";
/// Default key name for the entry's message.
pub const DEFAULT_MESSAGE_KEY: &str = "message";

/// Reserved slot in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Time,
    Level,
    Message,
}

impl FieldKey {
    pub fn default_name(&self) -> &'static str {
        match self {
            FieldKey::Time => DEFAULT_TIME_KEY,
            FieldKey::Level => DEFAULT_LEVEL_KEY,
            FieldKey::Message => DEFAULT_MESSAGE_KEY,
        }
    }
}

/// Per-role overrides for the output key names.
///
/// ```
/// use json_log_formatter::config::{FieldKey, FieldKeyMap};
///
/// let map = FieldKeyMap::default().time("@timestamp");
/// assert_eq!(map.resolve(FieldKey::Time), "@timestamp");
/// assert_eq!(map.resolve(FieldKey::Level), "level");
/// ```
///
/// Two roles mapped to the same name is a misconfiguration; the later
/// write wins in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldKeyMap {
    pub time: Option<String>,
    pub level: Option<String>,
    pub message: Option<String>,
}

impl FieldKeyMap {
    pub fn time(mut self, name: impl Into<String>) -> Self {
        self.time = Some(name.into());
        self
    }

    pub fn level(mut self, name: impl Into<String>) -> Self {
        self.level = Some(name.into());
        self
    }

    pub fn message(mut self, name: impl Into<String>) -> Self {
        self.message = Some(name.into());
        self
    }

    /// Output key for `key`, falling back to its default name when the
    /// role is unmapped or mapped to an empty string.
    pub fn resolve(&self, key: FieldKey) -> &str {
        let overridden = match key {
            FieldKey::Time => self.time.as_deref(),
            FieldKey::Level => self.level.as_deref(),
            FieldKey::Message => self.message.as_deref(),
        };
        match overridden {
            Some(name) if !name.is_empty() => name,
            _ => key.default_name(),
        }
    }
}

/// How the entry's time is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TimestampFormat {
    /// RFC 3339 with second precision, `Z` for UTC.
    #[default]
    Rfc3339,
    /// A chrono strftime pattern, e.g. `%Y-%m-%d %H:%M:%S%.3f`.
    Strftime(String),
}

impl TimestampFormat {
    /// Build from a pattern; an empty or malformed pattern yields RFC 3339.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if pattern.is_empty() || pattern.eq_ignore_ascii_case("rfc3339") {
            return TimestampFormat::Rfc3339;
        }
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return TimestampFormat::Rfc3339;
        }
        TimestampFormat::Strftime(pattern)
    }

    pub fn render(&self, time: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339 => rfc3339(time),
            TimestampFormat::Strftime(pattern) => {
                let mut out = String::new();
                match write!(out, "{}", time.format_with_items(StrftimeItems::new(pattern))) {
                    Ok(()) => out,
                    Err(_) => rfc3339(time),
                }
            }
        }
    }
}

impl From<String> for TimestampFormat {
    fn from(pattern: String) -> Self {
        TimestampFormat::pattern(pattern)
    }
}

impl From<&str> for TimestampFormat {
    fn from(pattern: &str) -> Self {
        TimestampFormat::pattern(pattern)
    }
}

fn rfc3339(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Configuration of a [`JsonFormatter`](crate::formatter::JsonFormatter).
///
/// **Fields**
/// - `timestamp_format`: rendering of the entry time, RFC 3339 by default.
/// - `disable_timestamp`: if `true`, no time key is emitted at all.
/// - `field_map`: output key names for the time, level and message roles.
///
/// Deserializable with every field optional, so it can be embedded in an
/// application's own config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub timestamp_format: TimestampFormat,
    pub disable_timestamp: bool,
    pub field_map: FieldKeyMap,
}

impl FormatterConfig {
    pub fn timestamp_format(mut self, format: impl Into<TimestampFormat>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    pub fn field_map(mut self, field_map: FieldKeyMap) -> Self {
        self.field_map = field_map;
        self
    }
}
