//! Async ingestion queue payloads and the single dispatcher task

use super::{emitter::Emitter, hook::panic_message, log_level::LogLevel};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

/// Queue payload: `[level, message, key, value, key, value, ...]`
///
/// Only used to move a call across the producer/dispatcher boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawPayload(Vec<Vec<u8>>);

/// A payload decoded back into call arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub level: LogLevel,
    pub message: String,
    pub args: Vec<String>,
}

impl RawPayload {
    pub(crate) fn encode<S: AsRef<str>>(level: LogLevel, message: &str, args: &[S]) -> Self {
        let mut parts = Vec::with_capacity(args.len() + 2);
        parts.push(level.to_str().as_bytes().to_vec());
        parts.push(message.as_bytes().to_vec());
        parts.extend(args.iter().map(|arg| arg.as_ref().as_bytes().to_vec()));
        Self(parts)
    }

    /// Decode lossily; `None` when the payload has no level slot
    pub(crate) fn decode(self) -> Option<Decoded> {
        let mut parts = self.0.into_iter().map(|part| match String::from_utf8(part) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        });

        let level = LogLevel::parse_lenient(&parts.next()?);
        let message = parts.next().unwrap_or_default();

        Some(Decoded {
            level,
            message,
            args: parts.collect(),
        })
    }
}

/// Spawn the dispatcher on `handle`.
///
/// The task drains `rx` in FIFO order until every sender is gone and the
/// queue is empty, then flushes the appenders and flips the returned
/// done-signal to `true`. A record that panics while being emitted is
/// reported on stderr and the task keeps draining.
pub(crate) fn spawn(
    handle: &Handle,
    mut rx: mpsc::Receiver<RawPayload>,
    emitter: Arc<Emitter>,
) -> watch::Receiver<bool> {
    let (done_tx, done_rx) = watch::channel(false);

    handle.spawn(async move {
        while let Some(payload) = rx.recv().await {
            emitter.metrics().record_dispatched();

            match payload.decode() {
                Some(call) => dispatch(&emitter, call),
                None => eprintln!("[LOGGER WARNING] Dropping empty async payload"),
            }
        }

        if let Err(e) = emitter.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        done_tx.send_replace(true);
    });

    done_rx
}

fn dispatch(emitter: &Emitter, call: Decoded) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        emitter.log(call.level, &call.message, call.args.as_slice())
    }));

    if let Err(panic_info) = result {
        eprintln!(
            "[LOGGER CRITICAL] Async record panicked during dispatch: {}. \
             Dispatcher continues.",
            panic_message(panic_info.as_ref())
        );
    }
}
