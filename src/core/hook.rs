//! Hook trait and the registry that fans records out to hooks

use super::{error::Result, log_level::LogLevel, log_record::LogRecord, metrics::LoggerMetrics};
use std::any::Any;
use std::sync::Arc;

/// An external delivery target for records, filtered by level.
///
/// Hooks are invoked synchronously from the emitting path, so `fire` must
/// not block: network-bound hooks hand their I/O to a background task.
/// Errors returned from `fire` are printed to stderr and never logged.
pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    /// Levels this hook accepts, precomputed at construction
    fn levels(&self) -> &[LogLevel];

    fn fire(&self, record: &LogRecord) -> Result<()>;

    fn accepts(&self, level: LogLevel) -> bool {
        self.levels().contains(&level)
    }
}

pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Immutable set of hooks, assembled once when the logger is built
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new(hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self { hooks }
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    /// Fire every hook that accepts the record's level.
    ///
    /// **Per-Hook Isolation**: each call is wrapped in `catch_unwind`, so a
    /// failing or panicking hook never prevents the others from firing.
    /// Returns the number of hooks that accepted the record.
    pub fn fire(&self, record: &LogRecord, metrics: &LoggerMetrics) -> usize {
        let mut fired = 0;

        for hook in self.hooks.iter().filter(|hook| hook.accepts(record.level)) {
            fired += 1;

            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| hook.fire(record)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    metrics.record_hook_failure();
                    eprintln!("[LOGGER ERROR] Hook '{}' failed: {}", hook.name(), e);
                }
                Err(panic_info) => {
                    metrics.record_hook_failure();
                    eprintln!(
                        "[LOGGER CRITICAL] Hook '{}' panicked: {}. \
                         Other hooks continue to function.",
                        hook.name(),
                        panic_message(panic_info.as_ref())
                    );
                }
            }
        }

        fired
    }
}
