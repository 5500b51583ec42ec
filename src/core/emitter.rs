//! Emit core: level gate, local appenders, then hooks
//!
//! Every record, whether logged synchronously or pulled off the async
//! queue by the dispatcher, goes through [`Emitter::emit`].

use super::{
    appender::Appender,
    error::Result,
    hook::{panic_message, HookRegistry},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    record_builder::{Attr, RecordBuilder},
    structured_error::StructuredError,
};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

pub(crate) struct Emitter {
    builder: RecordBuilder,
    min_level: RwLock<LogLevel>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    hooks: HookRegistry,
    metrics: Arc<LoggerMetrics>,
    exit_on_fatal: bool,
}

impl Emitter {
    pub(crate) fn new(
        builder: RecordBuilder,
        min_level: LogLevel,
        appenders: Vec<Box<dyn Appender>>,
        hooks: HookRegistry,
        metrics: Arc<LoggerMetrics>,
        exit_on_fatal: bool,
    ) -> Self {
        Self {
            builder,
            min_level: RwLock::new(min_level),
            appenders: Mutex::new(appenders),
            hooks,
            metrics,
            exit_on_fatal,
        }
    }

    pub(crate) fn builder(&self) -> &RecordBuilder {
        &self.builder
    }

    pub(crate) fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub(crate) fn metrics(&self) -> &Arc<LoggerMetrics> {
        &self.metrics
    }

    pub(crate) fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub(crate) fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    /// Build a record from key/value arguments and emit it.
    ///
    /// An argument-pairing warning, if any, is emitted first.
    pub(crate) fn log<S: AsRef<str>>(&self, level: LogLevel, message: &str, args: &[S]) {
        let built = self.builder.build(level, message, args);
        if let Some(warning) = built.warning {
            self.emit(warning);
        }
        self.emit(built.record);
    }

    pub(crate) fn log_attrs(&self, level: LogLevel, message: &str, attrs: &[Attr]) {
        self.emit(self.builder.build_attrs(level, message, attrs).record);
    }

    pub(crate) fn log_err(&self, err: Option<&dyn StructuredError>, args: &[&str], location: &str) {
        match err {
            Some(err) => self.emit(self.builder.build_from_error(err, args, location)),
            None => self.emit_local(self.builder.build_missing_error(location)),
        }
    }

    pub(crate) fn emit(&self, record: LogRecord) {
        if self.write_local(&record) {
            self.hooks.fire(&record, &self.metrics);
            self.terminate_if_required(&record);
        }
    }

    /// Emit to the appenders only; hooks never see the record
    pub(crate) fn emit_local(&self, record: LogRecord) {
        if self.write_local(&record) {
            self.terminate_if_required(&record);
        }
    }

    /// Level gate plus appenders. Returns `false` if the record was filtered.
    fn write_local(&self, record: &LogRecord) -> bool {
        if record.level < self.min_level() {
            self.metrics.record_filtered();
            return false;
        }

        {
            let mut appenders = self.appenders.lock();
            Self::process_sync(&mut appenders, record, &self.metrics);
        }
        self.metrics.record_emitted();
        true
    }

    /// Write a record to every appender with per-appender panic isolation
    ///
    /// One failing appender never prevents the others from receiving the
    /// record. Returns `true` if any appender failed.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        record: &LogRecord,
        metrics: &LoggerMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        }

        has_error
    }

    pub(crate) fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    fn terminate_if_required(&self, record: &LogRecord) {
        if !self.exit_on_fatal {
            return;
        }

        match record.level {
            LogLevel::Fatal => {
                if let Err(e) = self.flush() {
                    eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
                }
                std::process::exit(1);
            }
            LogLevel::Panic => panic!("{}", record.message),
            _ => {}
        }
    }
}
