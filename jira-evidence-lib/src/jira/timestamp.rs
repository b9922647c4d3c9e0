use super::description::render_generic;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

/// Jira's own timestamp layout, e.g. `2020-01-01T12:11:56.063+0530`
pub const JIRA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// The possible shapes of a timestamp field
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp<'a> {
    Absent,
    Text(&'a str),
    Instant(DateTime<FixedOffset>),
    Unknown(&'a Value),
}

impl<'a> Timestamp<'a> {
    /// Integral numbers are epoch milliseconds.
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map_or(Self::Unknown(value), |instant| Self::Instant(instant.fixed_offset())),
            _ => Self::Unknown(value),
        }
    }

    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Text(s) => (*s).to_string(),
            Self::Instant(instant) => format_instant(instant),
            Self::Unknown(value) => serde_json::to_string(value)
                .ok()
                .and_then(|encoded| serde_json::from_str::<String>(&encoded).ok())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| render_generic(value)),
        }
    }
}

#[must_use]
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.format(JIRA_TIME_FORMAT).to_string()
}

/// Normalize a timestamp value of any shape into a string.
#[must_use]
pub fn normalize_timestamp(value: &Value) -> String {
    Timestamp::classify(value).normalize()
}
