//! Basic logger usage example
//!
//! Demonstrates synchronous logging with key/value fields, structured errors
//! and different log levels.
//!
//! Run with: cargo run --example basic_usage

use rust_hook_logger::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Hook Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .appender(ConsoleAppender::new())
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message", &[]);
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", &[]);

    println!("\n2. Key/value fields:");
    logger.info("request served", &["route", "/health", "status", "200"]);
    logger.info_attrs("typed values", &[Attr::new("latency_ms", 12.5), Attr::new("retries", 0)]);

    println!("\n3. Odd argument count (produces a warning first):");
    logger.warn("missing value", &["user"]);

    println!("\n4. Structured errors:");
    let err = SErr::new("connection refused")
        .with_attrs(&["host", "db", "port", "5432"])
        .with_attr("prefix", "[DB]");
    logger.err(&err, &["attempt", "3"]);
    logger.log_err(None, &[]);
    logger.set_message_prefix("");

    println!("\n5. Changing the minimum level to INFO:");
    logger.set_min_level(LogLevel::Info);
    logger.debug("Debug message (hidden)", &[]);
    logger.info("Info message (visible)", &[]);

    logger.close().await;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
