//! Hook that forwards formatted records to a caller-owned channel

use crate::core::{Hook, LogLevel, LogRecord, OutputFormat, Result};
use crossbeam_channel::{Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Sends each accepted record, formatted as a text line, to a
/// `crossbeam_channel::Sender<String>`.
///
/// Delivery never blocks: when the channel is full (a zero-capacity channel
/// with no waiting receiver counts as full) or disconnected the line is
/// dropped and counted.
///
/// # Example
///
/// ```
/// use rust_hook_logger::hooks::ChannelHook;
/// use rust_hook_logger::{Hook, LogLevel, LogRecord};
///
/// let (tx, rx) = crossbeam_channel::bounded(8);
/// let hook = ChannelHook::new(tx, LogLevel::Warn);
///
/// hook.fire(&LogRecord::new(LogLevel::Error, "disk almost full")).unwrap();
/// assert!(rx.try_recv().unwrap().contains("disk almost full"));
/// ```
#[derive(Debug)]
pub struct ChannelHook {
    sender: Sender<String>,
    levels: Vec<LogLevel>,
    format: OutputFormat,
    dropped: AtomicU64,
}

impl ChannelHook {
    pub fn new(sender: Sender<String>, min_level: LogLevel) -> Self {
        Self {
            sender,
            levels: LogLevel::allowed_levels(min_level),
            format: OutputFormat::Text,
            dropped: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Lines dropped because the channel was full or disconnected
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Hook for ChannelHook {
    fn name(&self) -> &str {
        "channel"
    }

    fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    fn fire(&self, record: &LogRecord) -> Result<()> {
        match self.sender.try_send(self.format.format(record)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                eprintln!("[LOGGER WARNING] Log channel full, dropping message");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                eprintln!("[LOGGER WARNING] Log channel disconnected, dropping message");
            }
        }
        Ok(())
    }
}
