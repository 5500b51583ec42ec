//! Main logger implementation

use super::{
    appender::Appender,
    config::LogConfig,
    dispatcher::{self, RawPayload},
    emitter::Emitter,
    error::{LoggerError, Result},
    hook::{Hook, HookRegistry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    record_builder::{Attr, RecordBuilder},
    shutdown::ProducerTracker,
    structured_error::{PlainError, StructuredError},
};
use crate::appenders::ConsoleAppender;
use crate::hooks::{ChannelHook, HttpTransport, ReqwestTransport, SlackHook, TeamsHook};
use parking_lot::Mutex;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{mpsc, oneshot, watch};

/// Default shutdown timeout for [`Logger::close_timeout`] (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const SHUTDOWN_MESSAGE: &str = "Logs gracefully shutdown";

/// Producer side of the async queue.
///
/// `baton` is released by the most recently issued producer once its send
/// has completed; the next producer waits on it before sending.
struct QueueState {
    sender: Option<mpsc::Sender<RawPayload>>,
    baton: Option<oneshot::Receiver<()>>,
}

/// Structured logger handle
///
/// Synchronous calls build and emit a record on the calling thread. The
/// `*_async` calls return immediately and the record reaches the appenders
/// and hooks through the dispatcher, in the order the calls were issued.
/// Call [`Logger::close`] before exiting to drain the queue.
pub struct Logger {
    emitter: Arc<Emitter>,
    queue: Mutex<QueueState>,
    done: watch::Receiver<bool>,
    shutdown_logged: AtomicBool,
    producers: Arc<ProducerTracker>,
    handle: Handle,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_hook_logger::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> rust_hook_logger::Result<()> {
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .queue_capacity(100)
    ///     .build()?;
    ///
    /// logger.info("service started", &["port", "8080"]);
    /// logger.close().await;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Build a logger from configuration on the ambient Tokio runtime
    pub fn init(config: LogConfig) -> Result<Self> {
        LoggerBuilder::new().config(config).build()
    }

    pub fn log(&self, level: LogLevel, message: &str, args: &[&str]) {
        self.emitter.log(level, message, args);
    }

    #[inline]
    pub fn trace(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Trace, message, args);
    }

    #[inline]
    pub fn debug(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Debug, message, args);
    }

    #[inline]
    pub fn info(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Info, message, args);
    }

    #[inline]
    pub fn warn(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Warn, message, args);
    }

    #[inline]
    pub fn error(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Error, message, args);
    }

    /// Log at fatal level; exits the process with status 1 unless
    /// `exit_on_fatal(false)` was set on the builder.
    #[inline]
    pub fn fatal(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Fatal, message, args);
    }

    /// Log at panic level; panics with the message unless
    /// `exit_on_fatal(false)` was set on the builder.
    #[inline]
    pub fn panic(&self, message: &str, args: &[&str]) {
        self.log(LogLevel::Panic, message, args);
    }

    /// Log an error with its attributes plus extra key/value pairs.
    ///
    /// A `None` error logs an informational notice naming the call site
    /// instead.
    #[track_caller]
    pub fn log_err(&self, err: Option<&dyn StructuredError>, args: &[&str]) {
        let caller = Location::caller();
        let location = format!("{}:{}", caller.file(), caller.line());
        self.emitter.log_err(err, args, &location);
    }

    #[track_caller]
    pub fn err(&self, err: &dyn StructuredError, args: &[&str]) {
        self.log_err(Some(err), args);
    }

    /// Log any `std::error::Error` as an error record
    #[track_caller]
    pub fn log_std_err(&self, err: &dyn std::error::Error, args: &[&str]) {
        self.log_err(Some(&PlainError::new(err)), args);
    }

    pub fn log_attrs(&self, level: LogLevel, message: &str, attrs: &[Attr]) {
        self.emitter.log_attrs(level, message, attrs);
    }

    pub fn info_attrs(&self, message: &str, attrs: &[Attr]) {
        self.log_attrs(LogLevel::Info, message, attrs);
    }

    pub fn debug_attrs(&self, message: &str, attrs: &[Attr]) {
        self.log_attrs(LogLevel::Debug, message, attrs);
    }

    pub fn warn_attrs(&self, message: &str, attrs: &[Attr]) {
        self.log_attrs(LogLevel::Warn, message, attrs);
    }

    pub fn error_attrs(&self, message: &str, attrs: &[Attr]) {
        self.log_attrs(LogLevel::Error, message, attrs);
    }

    /// Queue a record for the dispatcher and return immediately.
    ///
    /// Records are dispatched in the order these calls were made. After
    /// [`Logger::close`] the call is rejected with a diagnostic on stderr.
    pub fn log_async(&self, level: LogLevel, message: &str, args: &[&str]) {
        let payload = RawPayload::encode(level, message, args);

        let mut queue = self.queue.lock();
        let Some(sender) = queue.sender.clone() else {
            drop(queue);
            self.emitter.metrics().record_rejected();
            eprintln!(
                "[LOGGER WARNING] Async log call after close, dropping: {}",
                message
            );
            return;
        };

        let ticket = self.producers.begin();
        let (release, next) = oneshot::channel();
        let previous = queue.baton.replace(next);
        drop(queue);

        self.emitter.metrics().record_enqueued();

        self.handle.spawn(async move {
            let _ticket = ticket;

            // Err means the previous producer is gone; its turn is over either way
            if let Some(previous) = previous {
                let _ = previous.await;
            }

            if sender.send(payload).await.is_err() {
                eprintln!("[LOGGER ERROR] Async queue closed before the record was queued");
            }

            let _ = release.send(());
        });
    }

    #[inline]
    pub fn trace_async(&self, message: &str, args: &[&str]) {
        self.log_async(LogLevel::Trace, message, args);
    }

    #[inline]
    pub fn debug_async(&self, message: &str, args: &[&str]) {
        self.log_async(LogLevel::Debug, message, args);
    }

    #[inline]
    pub fn info_async(&self, message: &str, args: &[&str]) {
        self.log_async(LogLevel::Info, message, args);
    }

    #[inline]
    pub fn warn_async(&self, message: &str, args: &[&str]) {
        self.log_async(LogLevel::Warn, message, args);
    }

    #[inline]
    pub fn error_async(&self, message: &str, args: &[&str]) {
        self.log_async(LogLevel::Error, message, args);
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.emitter.set_min_level(level);
    }

    pub fn min_level(&self) -> LogLevel {
        self.emitter.min_level()
    }

    pub fn message_prefix(&self) -> Option<String> {
        self.emitter.builder().prefix()
    }

    /// Replace the message prefix; an empty string removes it
    pub fn set_message_prefix(&self, prefix: impl Into<String>) {
        self.emitter.builder().set_prefix(Some(prefix.into()));
    }

    pub fn hook_names(&self) -> Vec<&str> {
        self.emitter.hooks().names()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_hook_logger::Logger;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> rust_hook_logger::Result<()> {
    /// let logger = Logger::builder().build()?;
    ///
    /// logger.info_async("queued", &[]);
    /// logger.close().await;
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.async_dispatched(), 1);
    /// println!("Drop rate: {:.2}%", metrics.drop_rate());
    /// # Ok(())
    /// # }
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        self.emitter.metrics()
    }

    /// Async calls that have not yet handed their record to the queue
    pub fn pending_producers(&self) -> usize {
        self.producers.outstanding()
    }

    pub fn flush(&self) -> Result<()> {
        self.emitter.flush()
    }

    /// Drain the async queue and stop the dispatcher.
    ///
    /// Waits for every outstanding async call to enqueue, closes the queue,
    /// waits for the dispatcher to emit everything that was queued, then
    /// logs a final shutdown notice once. A later call returns as soon as
    /// the dispatcher has finished, so retrying after a timed-out
    /// [`Logger::close_timeout`] still waits for the drain.
    pub async fn close(&self) {
        self.producers.wait_idle().await;

        // Producers that cloned the sender before this point keep the queue
        // open until they have sent.
        drop(self.queue.lock().sender.take());

        let mut done = self.done.clone();
        if done.wait_for(|finished| *finished).await.is_err() {
            eprintln!("[LOGGER ERROR] Dispatcher stopped before draining the queue");
        }

        if !self.shutdown_logged.swap(true, Ordering::AcqRel) {
            self.emitter.log::<&str>(LogLevel::Info, SHUTDOWN_MESSAGE, &[]);
        }
    }

    /// [`Logger::close`] bounded by `timeout`
    ///
    /// # Returns
    ///
    /// `true` if shutdown completed within the timeout, `false` otherwise
    pub async fn close_timeout(&self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.close()).await {
            Ok(()) => true,
            Err(_) => {
                eprintln!(
                    "[LOGGER WARNING] Logger did not drain within {:?}. \
                     Some logs may be lost.",
                    timeout
                );
                false
            }
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // The dispatcher keeps draining in the background once the last
        // sender is gone.
        if self.queue.get_mut().sender.take().is_some() {
            eprintln!(
                "[LOGGER WARNING] Logger dropped without close(); \
                 queued records are drained in the background"
            );
        }

        if let Err(e) = self.emitter.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.emitter.metrics().dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.emitter.metrics().drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Explicit setters take precedence over values from [`LoggerBuilder::config`].
///
/// # Example
/// ```
/// use rust_hook_logger::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> rust_hook_logger::Result<()> {
/// let (tx, rx) = crossbeam_channel::bounded(16);
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(ConsoleAppender::new().with_output_format(OutputFormat::Json))
///     .hook(ChannelHook::new(tx, LogLevel::Warn))
///     .message_prefix("[api]")
///     .build()?;
///
/// logger.warn("slow request", &["ms", "1500"]);
/// assert!(rx.try_recv().unwrap().contains("[api] slow request"));
/// logger.close().await;
/// # Ok(())
/// # }
/// ```
pub struct LoggerBuilder {
    config: LogConfig,
    min_level: Option<LogLevel>,
    output_format: Option<OutputFormat>,
    queue_capacity: Option<usize>,
    message_prefix: Option<String>,
    appenders: Vec<Box<dyn Appender>>,
    hooks: Vec<Arc<dyn Hook>>,
    transport: Option<Arc<dyn HttpTransport>>,
    runtime: Option<Handle>,
    exit_on_fatal: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
            min_level: None,
            output_format: None,
            queue_capacity: None,
            message_prefix: None,
            appenders: Vec::new(),
            hooks: Vec::new(),
            transport: None,
            runtime: None,
            exit_on_fatal: true,
        }
    }

    /// Start from a configuration; hooks it enables are added at build time
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Format of the default console appender
    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = Some(prefix.into());
        self
    }

    /// Add an appender
    ///
    /// Without any appender a [`ConsoleAppender`] is installed.
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Add a hook
    #[must_use = "builder methods return a new value"]
    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// HTTP transport for the configured Teams and Slack hooks
    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Runtime for the dispatcher, producer and network tasks
    ///
    /// Defaults to the runtime the builder is called from.
    #[must_use = "builder methods return a new value"]
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Whether fatal records exit the process and panic records panic
    #[must_use = "builder methods return a new value"]
    pub fn exit_on_fatal(mut self, exit: bool) -> Self {
        self.exit_on_fatal = exit;
        self
    }

    /// Build the Logger and start its dispatcher
    pub fn build(self) -> Result<Logger> {
        let mut config = self.config;
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if self.message_prefix.is_some() {
            config.message_prefix = self.message_prefix;
        }
        config.validate()?;

        let handle = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| LoggerError::NoRuntime)?,
        };

        let min_level = self.min_level.unwrap_or_else(|| config.min_level());
        let format = self.output_format.unwrap_or_else(|| config.output_format());

        let mut appenders = self.appenders;
        if appenders.is_empty() {
            appenders.push(Box::new(ConsoleAppender::new().with_output_format(format)));
        }

        let mut hooks = self.hooks;
        hooks.extend(configured_hooks(&config, self.transport, &handle)?);

        let emitter = Arc::new(Emitter::new(
            RecordBuilder::new(config.message_prefix.clone()),
            min_level,
            appenders,
            HookRegistry::new(hooks),
            Arc::new(LoggerMetrics::new()),
            self.exit_on_fatal,
        ));

        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let done = dispatcher::spawn(&handle, receiver, Arc::clone(&emitter));

        Ok(Logger {
            emitter,
            queue: Mutex::new(QueueState {
                sender: Some(sender),
                baton: None,
            }),
            done,
            shutdown_logged: AtomicBool::new(false),
            producers: Arc::new(ProducerTracker::new()),
            handle,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Hooks enabled in the configuration, in teams, slack, channel order
fn configured_hooks(
    config: &LogConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    handle: &Handle,
) -> Result<Vec<Arc<dyn Hook>>> {
    let mut hooks: Vec<Arc<dyn Hook>> = Vec::new();

    let transport = if config.teams.enabled || config.slack.enabled {
        match transport {
            Some(transport) => Some(transport),
            None => Some(Arc::new(ReqwestTransport::new()?) as Arc<dyn HttpTransport>),
        }
    } else {
        None
    };

    if let (true, Some(transport)) = (config.teams.enabled, &transport) {
        hooks.push(Arc::new(TeamsHook::new(
            config.teams.endpoint.clone(),
            LogLevel::parse_lenient(&config.teams.min_level),
            Arc::clone(transport),
            handle.clone(),
        )));
    }

    if let (true, Some(transport)) = (config.slack.enabled, &transport) {
        hooks.push(Arc::new(SlackHook::new(
            config.slack.token.clone(),
            config.slack.channel_id.clone(),
            LogLevel::parse_lenient(&config.slack.min_level),
            config.slack.use_blocks,
            Arc::clone(transport),
            handle.clone(),
        )));
    }

    if config.channel.enabled {
        if let Some(sender) = &config.channel.sender {
            hooks.push(Arc::new(ChannelHook::new(
                sender.clone(),
                LogLevel::parse_lenient(&config.channel.min_level),
            )));
        }
    }

    Ok(hooks)
}
