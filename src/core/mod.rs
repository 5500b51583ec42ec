//! Core logger types and traits

pub mod appender;
pub mod config;
mod dispatcher;
mod emitter;
pub mod error;
pub mod fields;
pub mod hook;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record_builder;
mod shutdown;
pub mod structured_error;

pub use appender::Appender;
pub use config::{ChannelConfig, LogConfig, SlackConfig, TeamsConfig, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use fields::Fields;
pub use hook::{Hook, HookRegistry};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use record_builder::{Attr, Built, RecordBuilder};
pub use structured_error::{PlainError, SErr, StructuredError};
