//! Errors that carry their own log attributes
//!
//! Any error can be logged. Errors implementing [`StructuredError`] also
//! contribute key-value attributes to the record; plain `std::error::Error`
//! values are adapted through [`PlainError`], which contributes none.

use super::record_builder::pair_args;
use std::error::Error;
use std::fmt;

/// Attribute that replaces the logger's message prefix instead of becoming a field
pub const PREFIX_KEY: &str = "prefix";
/// Field always populated with the error's string form
pub const ERROR_KEY: &str = "error";
/// User-facing message for UI layers; never logged
pub const USER_MSG_KEY: &str = "user_msg";
/// User-facing severity for UI layers; never logged
pub const USER_MSG_SEVERITY_KEY: &str = "user_msg_severity";
/// Caller location appended when the error is logged
pub const LOCATION_KEY: &str = "location";

/// Capability of an error to expose structured attributes.
///
/// Attributes are returned in insertion order and a key may appear more
/// than once; the record builder joins repeated values with `" -> "`.
pub trait StructuredError: fmt::Display {
    fn attributes(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Adapter that lets any `std::error::Error` be logged as a structured error
pub struct PlainError<'a> {
    inner: &'a (dyn Error + 'a),
}

impl<'a> PlainError<'a> {
    pub fn new(inner: &'a (dyn Error + 'a)) -> Self {
        Self { inner }
    }
}

impl fmt::Display for PlainError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl StructuredError for PlainError<'_> {}

/// Error with an attached list of key-value attributes.
///
/// # Example
///
/// ```
/// use rust_hook_logger::SErr;
///
/// let err = SErr::new("connection timeout")
///     .with_attrs(&["host", "db.example.com", "port", "5432"])
///     .with_attr("prefix", "[DB]");
///
/// assert_eq!(err.attr("host"), Some("db.example.com"));
/// assert_eq!(err.to_string(), "connection timeout");
/// ```
#[derive(Debug)]
pub struct SErr {
    message: String,
    attributes: Vec<(String, String)>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl SErr {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attributes: Vec::new(),
            source: None,
        }
    }

    /// Wrap an underlying error with additional context.
    ///
    /// The display form becomes `"<message>: <source>"`.
    pub fn wrap<E>(source: E, message: impl Into<String>) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            attributes: Vec::new(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Add alternating key/value attributes; a dangling key gets an empty value
    #[must_use]
    pub fn with_attrs(mut self, pairs: &[&str]) -> Self {
        self.append_attributes(pairs);
        self
    }

    pub fn append_attributes(&mut self, pairs: &[&str]) {
        self.attributes.extend(pair_args(pairs));
    }

    /// Most recent value recorded for `key`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for SErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl StructuredError for SErr {
    fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.clone()
    }
}
