//! Output format configuration for log records
//!
//! Provides the two output formats a local appender can use:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format, one object per line

use super::log_record::LogRecord;
use serde::{Deserialize, Serialize};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.120Z] [INFO ] Request processed route=/`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.120Z","level":"INFO","message":"Request processed","route":"/"}`
    Json,
}

impl OutputFormat {
    /// `"json"` selects JSON, anything else selects text
    pub fn parse_lenient(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Format a log record according to this output format
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            OutputFormat::Text => self.format_text(record),
            OutputFormat::Json => self.format_json(record),
        }
    }

    /// Format as human-readable text
    fn format_text(&self, record: &LogRecord) -> String {
        Self::text_line(record, &format!("{:5}", record.level.to_str()))
    }

    /// Text line layout with a caller-rendered level token
    pub(crate) fn text_line(record: &LogRecord, level: &str) -> String {
        let base = format!(
            "[{}] [{}] {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            level,
            record.message
        );

        if record.fields.is_empty() {
            base
        } else {
            format!("{} {}", base, record.fields.format_fields())
        }
    }

    /// Format as JSON
    fn format_json(&self, record: &LogRecord) -> String {
        let mut json_obj = serde_json::Map::new();

        // Fields first so the fixed keys win on collision
        for (key, value) in &record.fields {
            json_obj.insert(key.clone(), serde_json::Value::String(value.clone()));
        }

        json_obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(record.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.message.clone()),
        );

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }
}
