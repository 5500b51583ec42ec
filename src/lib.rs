//! # Rust Hook Logger
//!
//! A structured logging library that turns log calls into leveled field
//! records and fans them out to local appenders and external hooks.
//!
//! ## Features
//!
//! - **Structured records**: key/value pairs and structured errors become fields
//! - **Ordered async logging**: `*_async` calls never block and are dispatched in call order
//! - **Graceful shutdown**: `close()` drains every queued record
//! - **Hooks**: Teams webhook, Slack Web API and caller-owned channels, filtered by level

pub mod appenders;
pub mod core;
pub mod hooks;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::ConsoleAppender;
    pub use crate::core::{
        Appender, Attr, Fields, Hook, LogConfig, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, OutputFormat, PlainError, Result, SErr, StructuredError,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::hooks::{ChannelHook, SlackHook, TeamsHook};
}

pub use appenders::ConsoleAppender;
pub use core::{
    Appender, Attr, Built, ChannelConfig, Fields, Hook, HookRegistry, LogConfig, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, PlainError,
    RecordBuilder, Result, SErr, SlackConfig, StructuredError, TeamsConfig,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
