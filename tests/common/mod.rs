//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_hook_logger::hooks::{HttpRequest, HttpResponse, HttpTransport};
use rust_hook_logger::{Appender, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Appender that keeps every record it receives
#[derive(Clone, Default)]
pub struct CaptureAppender {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl CaptureAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|r| r.message.clone()).collect()
    }

    pub fn find(&self, message: &str) -> Option<LogRecord> {
        self.records
            .lock()
            .iter()
            .find(|r| r.message == message)
            .cloned()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        self.records.lock().iter().filter(|r| r.level == level).count()
    }
}

impl Appender for CaptureAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Transport that records requests and answers with a canned response
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    response: HttpResponse,
}

impl RecordingTransport {
    pub fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            response: HttpResponse {
                status,
                body: body.to_string(),
            },
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Poll until `count` requests arrived or `timeout` elapsed
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<HttpRequest> {
        let start = Instant::now();
        while self.requests.lock().len() < count && start.elapsed() < timeout {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.requests()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().push(request);
        Ok(self.response.clone())
    }
}

/// Transport whose every request fails before reaching a server
#[derive(Default)]
pub struct FailingTransport {
    attempts: AtomicUsize,
}

impl FailingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub async fn wait_for(&self, count: usize, timeout: Duration) -> usize {
        let start = Instant::now();
        while self.attempts() < count && start.elapsed() < timeout {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.attempts()
    }
}

#[async_trait]
impl HttpTransport for FailingTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(LoggerError::other(format!("connection refused: {}", request.url)))
    }
}

/// Builder preset used by most tests: trace level, capture appender, no exits
pub fn capture_builder(capture: &CaptureAppender) -> LoggerBuilder {
    Logger::builder()
        .min_level(LogLevel::Trace)
        .appender(capture.clone())
        .exit_on_fatal(false)
}
