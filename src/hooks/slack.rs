//! Slack Web API hook (`chat.postMessage`)

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::core::{Hook, LogLevel, LogRecord, LoggerError, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::runtime::Handle;

pub const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Fields shown in the summary section of a block message
const COMMON_FIELDS: [&str; 5] = ["service", "environment", "error_type", "component", "module"];

const STACK_TRACE_KEY: &str = "stack_trace";

fn emoji_and_header(level: LogLevel) -> (&'static str, &'static str) {
    match level {
        LogLevel::Panic | LogLevel::Fatal => ("\u{1F6A8}", "Critical Error"),
        LogLevel::Error => ("\u{274C}", "Error"),
        LogLevel::Warn => ("\u{26A0}\u{FE0F}", "Warning"),
        LogLevel::Info => ("\u{2139}\u{FE0F}", "Information"),
        LogLevel::Debug => ("\u{1F50D}", "Debug"),
        LogLevel::Trace => ("\u{1F4DD}", "Trace"),
    }
}

/// `error_type` -> `Error Type`
fn format_field_name(field: &str) -> String {
    field
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_common_field(field: &str) -> bool {
    COMMON_FIELDS.contains(&field)
}

fn mrkdwn(text: String) -> Value {
    json!({ "type": "mrkdwn", "text": text })
}

/// Build the flat text payload
pub fn simple_message(channel: &str, record: &LogRecord) -> Value {
    let mut text = format!("*{}*: {}", record.level.to_str(), record.message);

    if !record.fields.is_empty() {
        text.push_str("\n\n*Fields:*");
        for (key, value) in &record.fields {
            text.push_str(&format!("\n\u{2022} `{}`: {}", key, value));
        }
    }

    json!({ "channel": channel, "text": text })
}

/// Build the block layout payload
pub fn block_message(channel: &str, record: &LogRecord) -> Value {
    let (emoji, header) = emoji_and_header(record.level);
    let level = record.level.to_str();

    let mut blocks = vec![json!({
        "type": "header",
        "text": { "type": "plain_text", "text": format!("{} {}", emoji, header) }
    })];

    if !record.fields.is_empty() {
        let mut fields: Vec<Value> = COMMON_FIELDS
            .iter()
            .filter_map(|name| {
                record
                    .field(name)
                    .map(|value| mrkdwn(format!("*{}:* `{}`", format_field_name(name), value)))
            })
            .collect();

        fields.push(mrkdwn(format!(
            "*Timestamp:* `{}`",
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )));
        fields.push(mrkdwn(format!("*Level:* `{}`", level)));

        blocks.push(json!({ "type": "section", "fields": fields }));
    }

    blocks.push(json!({
        "type": "section",
        "text": mrkdwn(format!("*Message:* {}", record.message))
    }));

    if let Some(stack_trace) = record.field(STACK_TRACE_KEY) {
        blocks.push(json!({ "type": "divider" }));
        blocks.push(json!({
            "type": "section",
            "text": mrkdwn(format!("```\n{}\n```", stack_trace))
        }));
    }

    let context: Vec<Value> = record
        .fields
        .iter()
        .filter(|(key, _)| !is_common_field(key) && key.as_str() != STACK_TRACE_KEY)
        .map(|(key, value)| mrkdwn(format!("`{}`: {}", key, value)))
        .collect();
    if !context.is_empty() {
        blocks.push(json!({ "type": "context", "elements": context }));
    }

    if record.level >= LogLevel::Error {
        let mut actions = Vec::new();

        if let Some(log_url) = record.field("log_url") {
            actions.push(json!({
                "type": "button",
                "text": { "type": "plain_text", "text": "View in Log System" },
                "url": log_url
            }));
        }
        if let Some(incident_id) = record.field("incident_id") {
            actions.push(json!({
                "type": "button",
                "text": { "type": "plain_text", "text": "View Incident" },
                "style": "danger",
                "value": format!("incident_{}", incident_id)
            }));
        }

        if !actions.is_empty() {
            blocks.push(json!({ "type": "actions", "elements": actions }));
        }
    }

    json!({
        "channel": channel,
        "text": format!("{}: {}", level, record.message),
        "blocks": blocks
    })
}

/// Check an HTTP response from `chat.postMessage`.
///
/// The API answers 200 for most failures and reports them in the body as
/// `{"ok": false, "error": "..."}`.
pub fn check_response(response: &HttpResponse) -> Result<()> {
    if response.status != 200 {
        return Err(LoggerError::http_status(
            "slack",
            response.status,
            response.body.clone(),
        ));
    }

    let body: Value = serde_json::from_str(&response.body)?;
    if body.get("ok").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("ok=false");
        return Err(LoggerError::SlackApi(message.to_string()));
    }

    Ok(())
}

/// Posts accepted records to a Slack channel through the Web API.
///
/// Each record is handed to a detached task on `handle` which builds the
/// payload, sends it with the bot token and checks the API response.
pub struct SlackHook {
    token: String,
    channel: String,
    levels: Vec<LogLevel>,
    use_blocks: bool,
    api_url: String,
    transport: Arc<dyn HttpTransport>,
    handle: Handle,
}

impl SlackHook {
    pub fn new(
        token: impl Into<String>,
        channel: impl Into<String>,
        min_level: LogLevel,
        use_blocks: bool,
        transport: Arc<dyn HttpTransport>,
        handle: Handle,
    ) -> Self {
        Self {
            token: token.into(),
            channel: channel.into(),
            levels: LogLevel::allowed_levels(min_level),
            use_blocks,
            api_url: SLACK_POST_MESSAGE_URL.to_string(),
            transport,
            handle,
        }
    }

    /// Override the API endpoint, e.g. for a proxy
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// Request body for one record in the configured layout
pub fn payload(channel: &str, use_blocks: bool, record: &LogRecord) -> Value {
    if use_blocks {
        block_message(channel, record)
    } else {
        simple_message(channel, record)
    }
}

impl Hook for SlackHook {
    fn name(&self) -> &str {
        "slack"
    }

    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, record: &LogRecord) -> Result<()> {
        let record = record.clone();
        let channel = self.channel.clone();
        let use_blocks = self.use_blocks;
        let url = self.api_url.clone();
        let token = self.token.clone();
        let transport = Arc::clone(&self.transport);

        self.handle.spawn(async move {
            let request = HttpRequest {
                url,
                bearer_token: Some(token),
                body: payload(&channel, use_blocks, &record),
            };

            let result = match transport.post_json(request).await {
                Ok(response) => check_response(&response),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                eprintln!("[LOGGER ERROR] Error sending log to Slack: {}", e);
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fields;

    fn error_record() -> LogRecord {
        LogRecord::new(LogLevel::Error, "checkout failed").with_fields(
            Fields::new()
                .with_field("service", "billing")
                .with_field("error_type", "timeout")
                .with_field("stack_trace", "at charge()\nat main()")
                .with_field("order", "A-17")
                .with_field("log_url", "https://logs.example.com/q=A-17")
                .with_field("incident_id", "42"),
        )
    }

    #[test]
    fn test_format_field_name() {
        assert_eq!(format_field_name("error_type"), "Error Type");
        assert_eq!(format_field_name("service"), "Service");
    }

    #[test]
    fn test_simple_message() {
        let record = LogRecord::new(LogLevel::Warn, "slow")
            .with_fields(Fields::new().with_field("ms", "1500"));

        let payload = simple_message("C123", &record);

        assert_eq!(payload["channel"], "C123");
        assert_eq!(payload["text"], "*WARN*: slow\n\n*Fields:*\n\u{2022} `ms`: 1500");
        assert!(payload.get("blocks").is_none());
    }

    #[test]
    fn test_block_message_layout() {
        let payload = block_message("C123", &error_record());
        let blocks = payload["blocks"].as_array().unwrap();

        assert_eq!(payload["text"], "ERROR: checkout failed");
        assert_eq!(blocks[0]["type"], "header");
        assert_eq!(blocks[0]["text"]["text"], "\u{274C} Error");

        let summary = blocks[1]["fields"].as_array().unwrap();
        assert_eq!(summary[0]["text"], "*Service:* `billing`");
        assert_eq!(summary[1]["text"], "*Error Type:* `timeout`");
        assert!(summary[2]["text"].as_str().unwrap().starts_with("*Timestamp:*"));
        assert_eq!(summary[3]["text"], "*Level:* `ERROR`");

        assert_eq!(blocks[2]["text"]["text"], "*Message:* checkout failed");
        assert_eq!(blocks[3]["type"], "divider");
        assert_eq!(blocks[4]["text"]["text"], "```\nat charge()\nat main()\n```");

        assert_eq!(blocks[5]["type"], "context");
        let context = blocks[5]["elements"].as_array().unwrap();
        assert!(context.iter().any(|e| e["text"] == "`order`: A-17"));
        assert!(!context.iter().any(|e| e["text"].as_str().unwrap().contains("service")));

        assert_eq!(blocks[6]["type"], "actions");
        let actions = blocks[6]["elements"].as_array().unwrap();
        assert_eq!(actions[0]["url"], "https://logs.example.com/q=A-17");
        assert_eq!(actions[1]["style"], "danger");
        assert_eq!(actions[1]["value"], "incident_42");
    }

    #[test]
    fn test_no_actions_below_error() {
        let mut record = error_record();
        record.level = LogLevel::Warn;

        let payload = block_message("C123", &record);
        let blocks = payload["blocks"].as_array().unwrap();
        assert!(blocks.iter().all(|b| b["type"] != "actions"));
    }

    #[test]
    fn test_block_message_without_fields() {
        let payload = block_message("C123", &LogRecord::new(LogLevel::Fatal, "down"));
        let blocks = payload["blocks"].as_array().unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["text"]["text"], "\u{1F6A8} Critical Error");
        assert_eq!(blocks[1]["text"]["text"], "*Message:* down");
    }

    #[test]
    fn test_payload_follows_layout_flag() {
        let record = error_record();

        let flat = payload("C1", false, &record);
        assert!(flat.get("blocks").is_none());
        assert_eq!(flat, simple_message("C1", &record));

        let blocks = payload("C1", true, &record);
        assert!(blocks["blocks"].is_array());
        assert_eq!(blocks["channel"], "C1");
    }

    #[test]
    fn test_check_response() {
        let ok = HttpResponse {
            status: 200,
            body: r#"{"ok":true}"#.to_string(),
        };
        assert!(check_response(&ok).is_ok());

        let api_error = HttpResponse {
            status: 200,
            body: r#"{"ok":false,"error":"channel_not_found"}"#.to_string(),
        };
        match check_response(&api_error) {
            Err(LoggerError::SlackApi(msg)) => assert_eq!(msg, "channel_not_found"),
            other => panic!("unexpected result: {:?}", other),
        }

        let http_error = HttpResponse {
            status: 500,
            body: "oops".to_string(),
        };
        assert!(matches!(
            check_response(&http_error),
            Err(LoggerError::HttpStatus { status: 500, .. })
        ));

        let garbage = HttpResponse {
            status: 200,
            body: "not json".to_string(),
        };
        assert!(matches!(
            check_response(&garbage),
            Err(LoggerError::JsonError(_))
        ));
    }
}
