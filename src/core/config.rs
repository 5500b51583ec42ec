//! Logger configuration
//!
//! [`LogConfig`] can be built in code or deserialized with serde from any
//! format the caller already uses. Level and formatter names are parsed
//! leniently; [`LogConfig::validate`] rejects the combinations that cannot
//! produce a working logger.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    output_format::OutputFormat,
};
use serde::Deserialize;

/// Default bound of the async ingestion queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 2000;

const DEFAULT_LEVEL: &str = "debug";
const DEFAULT_HOOK_LEVEL: &str = "warn";

fn default_hook_level() -> String {
    DEFAULT_HOOK_LEVEL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Prepended to every message, separated by a space
    pub message_prefix: Option<String>,

    /// `"json"` selects JSON output; anything else is text
    pub formatter: String,

    /// Minimum level; unknown names fall back to info
    pub level: String,

    pub queue_capacity: usize,

    pub teams: TeamsConfig,
    pub slack: SlackConfig,
    pub channel: ChannelConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            message_prefix: None,
            formatter: "text".to_string(),
            level: DEFAULT_LEVEL.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            teams: TeamsConfig::default(),
            slack: SlackConfig::default(),
            channel: ChannelConfig::default(),
        }
    }
}

/// Teams incoming-webhook hook
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TeamsConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub min_level: String,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            min_level: default_hook_level(),
        }
    }
}

/// Slack `chat.postMessage` hook
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    pub enabled: bool,
    pub token: String,
    pub channel_id: String,
    pub min_level: String,
    /// Post a block layout instead of a single text line
    pub use_blocks: bool,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            token: String::new(),
            channel_id: String::new(),
            min_level: default_hook_level(),
            use_blocks: false,
        }
    }
}

/// Caller-supplied channel hook; the sender can only be set in code
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub enabled: bool,
    #[serde(skip)]
    pub sender: Option<crossbeam_channel::Sender<String>>,
    pub min_level: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: None,
            min_level: default_hook_level(),
        }
    }
}

impl LogConfig {
    pub fn min_level(&self) -> LogLevel {
        LogLevel::parse_lenient(&self.level)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::parse_lenient(&self.formatter)
    }

    /// Check the configuration for settings that cannot work
    ///
    /// # Example
    ///
    /// ```
    /// use rust_hook_logger::LogConfig;
    ///
    /// let mut config = LogConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.teams.enabled = true;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "queue",
                "queue_capacity must be at least 1",
            ));
        }

        if self.teams.enabled && self.teams.endpoint.trim().is_empty() {
            return Err(LoggerError::config(
                "teams",
                "hook is enabled but no endpoint is set",
            ));
        }

        if self.slack.enabled {
            if self.slack.token.trim().is_empty() {
                return Err(LoggerError::config(
                    "slack",
                    "hook is enabled but no token is set",
                ));
            }
            if self.slack.channel_id.trim().is_empty() {
                return Err(LoggerError::config(
                    "slack",
                    "hook is enabled but no channel_id is set",
                ));
            }
        }

        if self.channel.enabled && self.channel.sender.is_none() {
            return Err(LoggerError::config(
                "channel",
                "hook is enabled but no sender is set",
            ));
        }

        Ok(())
    }
}
