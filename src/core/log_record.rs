//! Log record structure

use super::fields::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized, leveled log entry.
///
/// Built once per log call and never mutated after it reaches the
/// emitter. Hooks receive it by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            fields: Fields::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let record = LogRecord::new(LogLevel::Info, "line one\nERROR fake\tentry");
        assert_eq!(record.message, "line one\\nERROR fake\\tentry");
    }

    #[test]
    fn test_with_fields() {
        let record = LogRecord::new(LogLevel::Warn, "disk low")
            .with_fields(Fields::new().with_field("mount", "/var"));

        assert_eq!(record.field("mount"), Some("/var"));
        assert_eq!(record.field("missing"), None);
    }
}
