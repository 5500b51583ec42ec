//! Logger metrics for observability
//!
//! Provides counters for monitoring logger health: records emitted and
//! filtered, appender and hook failures, and the async queue's traffic.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_hook_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_emitted();
/// metrics.record_enqueued();
///
/// assert_eq!(metrics.total_emitted(), 1);
/// assert_eq!(metrics.async_enqueued(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records that passed the level gate and reached the appenders
    total_emitted: AtomicU64,

    /// Records below the minimum level
    filtered_count: AtomicU64,

    /// Records at least one appender failed to write
    dropped_count: AtomicU64,

    /// Async calls handed to a producer task
    async_enqueued: AtomicU64,

    /// Async records pulled off the queue by the dispatcher
    async_dispatched: AtomicU64,

    /// Async calls refused because the logger was closed
    rejected_after_close: AtomicU64,

    /// Hook invocations that returned an error or panicked
    hook_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_emitted: AtomicU64::new(0),
            filtered_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            async_enqueued: AtomicU64::new(0),
            async_dispatched: AtomicU64::new(0),
            rejected_after_close: AtomicU64::new(0),
            hook_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_emitted(&self) -> u64 {
        self.total_emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn async_enqueued(&self) -> u64 {
        self.async_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn async_dispatched(&self) -> u64 {
        self.async_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_close(&self) -> u64 {
        self.rejected_after_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hook_failures(&self) -> u64 {
        self.hook_failures.load(Ordering::Relaxed)
    }

    /// Each `record_*` returns the previous value
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.total_emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.async_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.async_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected_after_close.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_hook_failure(&self) -> u64 {
        self.hook_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Get appender drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been emitted.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_emitted() as f64;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_emitted.store(0, Ordering::Relaxed);
        self.filtered_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.async_enqueued.store(0, Ordering::Relaxed);
        self.async_dispatched.store(0, Ordering::Relaxed);
        self.rejected_after_close.store(0, Ordering::Relaxed);
        self.hook_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_emitted: AtomicU64::new(self.total_emitted()),
            filtered_count: AtomicU64::new(self.filtered_count()),
            dropped_count: AtomicU64::new(self.dropped_count()),
            async_enqueued: AtomicU64::new(self.async_enqueued()),
            async_dispatched: AtomicU64::new(self.async_dispatched()),
            rejected_after_close: AtomicU64::new(self.rejected_after_close()),
            hook_failures: AtomicU64::new(self.hook_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_emitted(), 0);
        assert_eq!(metrics.filtered_count(), 0);
        assert_eq!(metrics.dropped_count(), 0);
        assert_eq!(metrics.async_enqueued(), 0);
        assert_eq!(metrics.async_dispatched(), 0);
        assert_eq!(metrics.rejected_after_close(), 0);
        assert_eq!(metrics.hook_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_hook_failure(), 0);
        assert_eq!(metrics.record_hook_failure(), 1);
        assert_eq!(metrics.hook_failures(), 2);
    }

    #[test]
    fn test_metrics_drop_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..100 {
            metrics.record_emitted();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();
        metrics.record_enqueued();
        metrics.record_rejected();

        metrics.reset();

        assert_eq!(metrics.total_emitted(), 0);
        assert_eq!(metrics.async_enqueued(), 0);
        assert_eq!(metrics.rejected_after_close(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_dispatched();

        let snapshot = metrics.clone();
        metrics.record_dispatched();

        assert_eq!(metrics.async_dispatched(), 2);
        assert_eq!(snapshot.async_dispatched(), 1);
    }
}
