//! Appender trait for local log output destinations

use super::{error::Result, log_record::LogRecord};

pub trait Appender: Send + Sync {
    fn append(&mut self, record: &LogRecord) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
