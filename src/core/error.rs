//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// No Tokio runtime was supplied or found on the building thread
    #[error("No Tokio runtime available: build the logger inside a runtime or pass a handle")]
    NoRuntime,

    /// HTTP transport failure (connect, timeout, body read)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote endpoint answered with a non-success status
    #[error("HTTP {status} from {target}: {body}")]
    HttpStatus {
        target: String,
        status: u16,
        body: String,
    },

    /// Messaging API accepted the request but reported a failure
    #[error("Slack API error: {0}")]
    SlackApi(String),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(target: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        LoggerError::HttpStatus {
            target: target.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("TeamsHook", "endpoint is empty");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::http_status("teams", 502, "bad gateway");
        assert!(matches!(err, LoggerError::HttpStatus { status: 502, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("SlackHook", "token is empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for SlackHook: token is empty"
        );

        let err = LoggerError::http_status("teams", 400, "Bad payload");
        assert_eq!(err.to_string(), "HTTP 400 from teams: Bad payload");

        let err = LoggerError::SlackApi("channel_not_found".to_string());
        assert_eq!(err.to_string(), "Slack API error: channel_not_found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: LoggerError = io_err.into();

        assert!(matches!(err, LoggerError::IoError(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
