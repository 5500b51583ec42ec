//! Async logging example
//!
//! Demonstrates ordered async logging from several threads and a graceful
//! shutdown that drains every queued record.
//!
//! Run with: cargo run --example async_logging

use rust_hook_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Hook Logger - Async Logging Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .min_level(LogLevel::Debug)
            .output_format(OutputFormat::Json)
            .queue_capacity(64)
            .build()?,
    );

    println!("1. Async logging never blocks the caller:");
    for i in 0..100 {
        logger.info_async(&format!("Message #{}", i), &["seq", i.to_string().as_str()]);
    }
    println!("   Issued 100 async calls, {} still waiting for the queue", logger.pending_producers());

    println!("\n2. Multi-threaded logging:");
    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..20 {
                logger.debug_async(
                    &format!("Thread {} - Message {}", thread_id, i),
                    &["thread", thread_id.to_string().as_str()],
                );
                thread::sleep(Duration::from_millis(1));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }
    println!("   5 threads logged 20 messages each");

    println!("\n3. Graceful shutdown:");
    if !logger.close_timeout(DEFAULT_SHUTDOWN_TIMEOUT).await {
        eprintln!("Logger did not drain in time");
    }

    let metrics = logger.metrics();
    println!(
        "   enqueued={} dispatched={} rejected={}",
        metrics.async_enqueued(),
        metrics.async_dispatched(),
        metrics.rejected_after_close()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
