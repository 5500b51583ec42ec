//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. They log the
//! formatted message without fields; use the [`Logger`](crate::Logger)
//! methods directly to attach key/value pairs.
//!
//! # Examples
//!
//! ```
//! use rust_hook_logger::prelude::*;
//! use rust_hook_logger::info;
//!
//! # #[tokio::main]
//! # async fn main() -> rust_hook_logger::Result<()> {
//! let logger = Logger::builder().build()?;
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! logger.close().await;
//! # Ok(())
//! # }
//! ```

/// Log a message with automatic formatting.
///
/// `log!(logger, LogLevel::Error, "Error code: {}", 500)`
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, &format!($($arg)+), &[])
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// `warn!(logger, "Retry attempt {} of {}", 3, 5)`
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Appender, LogLevel, LogRecord, Logger, Result};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<LogRecord>>>);

    impl Appender for Capture {
        fn append(&mut self, record: &LogRecord) -> Result<()> {
            self.0.lock().push(record.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    #[tokio::test]
    async fn test_macros_format_messages() {
        let capture = Capture::default();
        let logger = Logger::builder()
            .min_level(LogLevel::Trace)
            .appender(capture.clone())
            .build()
            .unwrap();

        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        trace!(logger, "Value: {}", 10);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);

        let messages: Vec<(LogLevel, String)> = capture
            .0
            .lock()
            .iter()
            .map(|r| (r.level, r.message.clone()))
            .collect();

        assert_eq!(
            messages,
            vec![
                (LogLevel::Info, "Formatted: 42".to_string()),
                (LogLevel::Trace, "Value: 10".to_string()),
                (LogLevel::Debug, "Count: 5".to_string()),
                (LogLevel::Info, "Items: 100".to_string()),
                (LogLevel::Warn, "Retry 1 of 3".to_string()),
                (LogLevel::Error, "Code: 500".to_string()),
            ]
        );

        logger.close().await;
    }
}
