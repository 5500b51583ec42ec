//! Turns log call arguments into [`LogRecord`]s
//!
//! Two call shapes are supported: a message with alternating key/value
//! arguments, and an error (optionally structured) with extra pairs. The
//! builder also owns the logger's message prefix, because a `prefix`
//! attribute on a logged error replaces it.

use super::fields::Fields;
use super::log_level::LogLevel;
use super::log_record::LogRecord;
use super::structured_error::{
    StructuredError, ERROR_KEY, LOCATION_KEY, PREFIX_KEY, USER_MSG_KEY, USER_MSG_SEVERITY_KEY,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;

/// Pair alternating key/value arguments; a dangling key gets an empty value
pub(crate) fn pair_args<S: AsRef<str>>(args: &[S]) -> Vec<(String, String)> {
    args.chunks(2)
        .map(|pair| {
            let key = pair[0].as_ref().to_string();
            let value = pair.get(1).map(|v| v.as_ref().to_string()).unwrap_or_default();
            (key, value)
        })
        .collect()
}

/// A key/value attribute built from any displayable values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub key: String,
    pub value: String,
}

impl Attr {
    pub fn new(key: impl fmt::Display, value: impl fmt::Display) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result of [`RecordBuilder::build`].
///
/// `warning` is set when the arguments could not be paired evenly; the
/// logger emits it ahead of `record`.
#[derive(Debug, Clone)]
pub struct Built {
    pub record: LogRecord,
    pub warning: Option<LogRecord>,
}

#[derive(Debug, Default)]
pub struct RecordBuilder {
    prefix: RwLock<Option<String>>,
}

impl RecordBuilder {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix: RwLock::new(prefix.filter(|p| !p.is_empty())),
        }
    }

    pub fn prefix(&self) -> Option<String> {
        self.prefix.read().clone()
    }

    /// Replace the message prefix; an empty string clears it
    pub fn set_prefix(&self, prefix: Option<String>) {
        *self.prefix.write() = prefix.filter(|p| !p.is_empty());
    }

    fn apply_prefix(&self, message: &str) -> String {
        match self.prefix.read().as_deref() {
            Some(prefix) => format!("{} {}", prefix, message),
            None => message.to_string(),
        }
    }

    /// Build a record from a message and alternating key/value arguments.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_hook_logger::{LogLevel, RecordBuilder};
    ///
    /// let builder = RecordBuilder::new(None);
    /// let built = builder.build(LogLevel::Info, "user signed in", &["user", "42"]);
    ///
    /// assert!(built.warning.is_none());
    /// assert_eq!(built.record.field("user"), Some("42"));
    /// ```
    pub fn build<S: AsRef<str>>(&self, level: LogLevel, message: &str, args: &[S]) -> Built {
        let fields: Fields = pair_args(args).into_iter().collect();

        let warning = (args.len() % 2 != 0).then(|| {
            let raw: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
            LogRecord::new(
                LogLevel::Warn,
                format!(
                    "Even number of args required for log call (nbr of args: {})",
                    args.len()
                ),
            )
            .with_fields(
                Fields::new()
                    .with_field("msg", message)
                    .with_field("args", format!("{:?}", raw)),
            )
        });

        Built {
            record: LogRecord::new(level, self.apply_prefix(message)).with_fields(fields),
            warning,
        }
    }

    pub fn build_attrs(&self, level: LogLevel, message: &str, attrs: &[Attr]) -> Built {
        let args: Vec<&str> = attrs
            .iter()
            .flat_map(|attr| [attr.key.as_str(), attr.value.as_str()])
            .collect();
        self.build(level, message, &args)
    }

    /// Build an `Error` record from an error, its attributes and extra pairs.
    ///
    /// Repeated attribute keys are joined with `" -> "` in insertion order.
    /// `prefix` replaces this builder's message prefix, the user-facing keys
    /// are dropped, and `error` falls back to the error's string form.
    pub fn build_from_error(
        &self,
        err: &dyn StructuredError,
        args: &[&str],
        location: &str,
    ) -> LogRecord {
        let mut attributes = err.attributes();
        attributes.push((LOCATION_KEY.to_string(), location.to_string()));
        attributes.extend(pair_args(args));

        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in attributes {
            grouped.entry(key).or_default().push(value);
        }

        let mut fields = Fields::new();
        for (key, values) in grouped {
            if key.is_empty() {
                continue;
            }
            let value = values.join(" -> ");

            match key.to_lowercase().as_str() {
                USER_MSG_KEY | USER_MSG_SEVERITY_KEY => continue,
                PREFIX_KEY => self.set_prefix(Some(value)),
                _ => fields.insert(key, value),
            }
        }

        let message = err.to_string();
        if !fields.contains_key(ERROR_KEY) {
            fields.insert(ERROR_KEY, message.as_str());
        }

        LogRecord::new(LogLevel::Error, self.apply_prefix(&message)).with_fields(fields)
    }

    /// Informational record emitted in place of a missing error
    pub fn build_missing_error(&self, location: &str) -> LogRecord {
        self.build(
            LogLevel::Info,
            "Not logging a None error",
            &["called from", location],
        )
        .record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::structured_error::{PlainError, SErr};

    #[test]
    fn test_build_even_args() {
        let builder = RecordBuilder::new(None);
        let built = builder.build(LogLevel::Warn, "slow", &["latency_ms", "1500", "route", "/"]);

        assert!(built.warning.is_none());
        assert_eq!(built.record.level, LogLevel::Warn);
        assert_eq!(built.record.message, "slow");
        assert_eq!(built.record.fields.len(), 2);
        assert_eq!(built.record.field("latency_ms"), Some("1500"));
        assert_eq!(built.record.field("route"), Some("/"));
    }

    #[test]
    fn test_build_odd_args_pairs_last_key_with_empty_value() {
        let builder = RecordBuilder::new(None);
        let built = builder.build(LogLevel::Info, "odd", &["a", "1", "b"]);

        assert_eq!(built.record.field("a"), Some("1"));
        assert_eq!(built.record.field("b"), Some(""));

        let warning = built.warning.expect("odd args should produce a warning");
        assert_eq!(warning.level, LogLevel::Warn);
        assert!(warning.message.contains("nbr of args: 3"));
        assert_eq!(warning.field("msg"), Some("odd"));
    }

    #[test]
    fn test_prefix_is_applied() {
        let builder = RecordBuilder::new(Some("[svc]".to_string()));
        let built = builder.build::<&str>(LogLevel::Info, "started", &[]);
        assert_eq!(built.record.message, "[svc] started");

        builder.set_prefix(Some(String::new()));
        let built = builder.build::<&str>(LogLevel::Info, "started", &[]);
        assert_eq!(built.record.message, "started");
    }

    #[test]
    fn test_build_attrs() {
        let builder = RecordBuilder::new(None);
        let built = builder.build_attrs(
            LogLevel::Debug,
            "attrs",
            &[Attr::new("int_key", 42), Attr::new("float_key", 3.5)],
        );

        assert!(built.warning.is_none());
        assert_eq!(built.record.field("int_key"), Some("42"));
        assert_eq!(built.record.field("float_key"), Some("3.5"));
    }

    #[test]
    fn test_build_from_structured_error() {
        let builder = RecordBuilder::new(None);
        let err = SErr::new("connection refused")
            .with_attrs(&["host", "db", "port", "5432"])
            .with_attr("prefix", "[DB]");

        let record = builder.build_from_error(&err, &[], "src/db.rs:10");

        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.message, "[DB] connection refused");
        assert_eq!(record.field("host"), Some("db"));
        assert_eq!(record.field("port"), Some("5432"));
        assert_eq!(record.field("error"), Some("connection refused"));
        assert_eq!(record.field("location"), Some("src/db.rs:10"));
        assert!(!record.fields.contains_key("prefix"));
        assert_eq!(builder.prefix().as_deref(), Some("[DB]"));
    }

    #[test]
    fn test_build_from_error_drops_user_facing_keys() {
        let builder = RecordBuilder::new(None);
        let err = SErr::new("denied")
            .with_attr("user_msg", "Please sign in again")
            .with_attr("USER_MSG_SEVERITY", "warning");

        let record = builder.build_from_error(&err, &[], "here");

        assert!(!record.fields.contains_key("user_msg"));
        assert!(!record.fields.contains_key("USER_MSG_SEVERITY"));
    }

    #[test]
    fn test_build_from_error_joins_repeated_keys_and_keeps_explicit_error() {
        let builder = RecordBuilder::new(None);
        let err = SErr::new("original").with_attr("step", "load");

        let record = builder.build_from_error(
            &err,
            &["step", "retry", "error", "from my point of view"],
            "here",
        );

        assert_eq!(record.field("step"), Some("load -> retry"));
        assert_eq!(record.field("error"), Some("from my point of view"));
        assert_eq!(record.message, "original");
    }

    #[test]
    fn test_build_from_plain_error() {
        let builder = RecordBuilder::new(None);
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");

        let record = builder.build_from_error(&PlainError::new(&io_err), &["key1", "v1"], "here");

        assert_eq!(record.message, "disk on fire");
        assert_eq!(record.field("error"), Some("disk on fire"));
        assert_eq!(record.field("key1"), Some("v1"));
    }

    #[test]
    fn test_build_missing_error() {
        let builder = RecordBuilder::new(None);
        let record = builder.build_missing_error("src/main.rs:3");

        assert_eq!(record.level, LogLevel::Info);
        assert_eq!(record.field("called from"), Some("src/main.rs:3"));
    }
}
