//! Microsoft Teams incoming-webhook hook (MessageCard payloads)

use super::transport::{HttpRequest, HttpTransport};
use crate::core::{Hook, LogLevel, LogRecord, LoggerError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;

const MESSAGE_CARD_TYPE: &str = "MessageCard";
const MESSAGE_CARD_CONTEXT: &str = "http://schema.org/extensions";

fn level_icon(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace | LogLevel::Debug => {
            "https://d2kk8pyj1kjlmo.cloudfront.net/icons/notepad_32.png"
        }
        LogLevel::Info => "https://d2kk8pyj1kjlmo.cloudfront.net/icons/note_32.png",
        LogLevel::Warn => "https://d2kk8pyj1kjlmo.cloudfront.net/icons/flash_32.png",
        LogLevel::Error => "https://d2kk8pyj1kjlmo.cloudfront.net/icons/error_32.png",
        LogLevel::Fatal | LogLevel::Panic => {
            "https://d2kk8pyj1kjlmo.cloudfront.net/icons/dead_scrn_32.png"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: String,
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    pub sections: Vec<Section>,
    #[serde(rename = "potentialAction")]
    pub potential_action: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activity_title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activity_image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub activity_text: String,
    pub facts: Vec<Fact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

impl MessageCard {
    /// Build the card for one record.
    ///
    /// The message becomes the title (a `msg` field overrides it), `error`
    /// becomes the activity text, and every other field becomes a fact.
    /// Values are wrapped in back-ticks so Teams does not render markdown.
    pub fn from_record(record: &LogRecord) -> Self {
        let mut section = Section {
            activity_title: record.message.clone(),
            activity_image: level_icon(record.level).to_string(),
            ..Default::default()
        };

        for (key, value) in &record.fields {
            match key.as_str() {
                "msg" => section.activity_title = value.clone(),
                "error" => section.activity_text = format!("`{}`", value),
                _ => section.facts.push(Fact {
                    name: key.clone(),
                    value: format!("`{}`", value),
                }),
            }
        }

        Self {
            card_type: MESSAGE_CARD_TYPE.to_string(),
            context: MESSAGE_CARD_CONTEXT.to_string(),
            summary: "Log".to_string(),
            sections: vec![section],
            potential_action: Vec::new(),
        }
    }
}

/// Posts a MessageCard per accepted record to a Teams webhook.
///
/// The card is built on the emitting path, but unlike a plain webhook
/// client the POST does not happen inline: it runs in a detached task on
/// `handle` so a slow endpoint never holds up the caller or the dispatcher.
/// Delivery order across records is therefore not guaranteed, and failures
/// (transport errors or non-2xx statuses) are reported on stderr only.
pub struct TeamsHook {
    endpoint: String,
    levels: Vec<LogLevel>,
    transport: Arc<dyn HttpTransport>,
    handle: Handle,
}

impl TeamsHook {
    pub fn new(
        endpoint: impl Into<String>,
        min_level: LogLevel,
        transport: Arc<dyn HttpTransport>,
        handle: Handle,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            levels: LogLevel::allowed_levels(min_level),
            transport,
            handle,
        }
    }

    pub(crate) async fn send(
        transport: &dyn HttpTransport,
        endpoint: String,
        card: MessageCard,
    ) -> Result<()> {
        let request = HttpRequest {
            url: endpoint.clone(),
            bearer_token: None,
            body: serde_json::to_value(&card)?,
        };

        let response = transport.post_json(request).await?;
        if !response.is_success() {
            return Err(LoggerError::http_status(
                endpoint,
                response.status,
                response.body,
            ));
        }
        Ok(())
    }
}

impl Hook for TeamsHook {
    fn name(&self) -> &str {
        "teams"
    }

    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, record: &LogRecord) -> Result<()> {
        let card = MessageCard::from_record(record);
        let transport = Arc::clone(&self.transport);
        let endpoint = self.endpoint.clone();

        self.handle.spawn(async move {
            if let Err(e) = Self::send(transport.as_ref(), endpoint, card).await {
                eprintln!("[LOGGER ERROR] Teams webhook delivery failed: {}", e);
            }
        });

        Ok(())
    }
}
