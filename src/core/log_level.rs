//! Log level definitions and threshold helpers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

impl LogLevel {
    /// Every level, least severe first
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Panic,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Panic => "PANIC",
        }
    }

    /// Parse a level, falling back to `Info` for anything unrecognised
    ///
    /// ```
    /// use rust_hook_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse_lenient("Warning"), LogLevel::Warn);
    /// assert_eq!(LogLevel::parse_lenient("verbose"), LogLevel::Info);
    /// ```
    pub fn parse_lenient(s: &str) -> Self {
        s.trim().parse().unwrap_or(LogLevel::Info)
    }

    /// The given threshold and every more severe level, in ascending order.
    ///
    /// Hooks compute this once at construction and match records against it.
    ///
    /// ```
    /// use rust_hook_logger::LogLevel;
    ///
    /// assert_eq!(
    ///     LogLevel::allowed_levels(LogLevel::Warn),
    ///     vec![LogLevel::Warn, LogLevel::Error, LogLevel::Fatal, LogLevel::Panic]
    /// );
    /// ```
    pub fn allowed_levels(threshold: LogLevel) -> Vec<LogLevel> {
        Self::ALL
            .iter()
            .copied()
            .filter(|level| *level >= threshold)
            .collect()
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal | LogLevel::Panic => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "PANIC" => Ok(LogLevel::Panic),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
