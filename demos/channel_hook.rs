//! Channel hook example
//!
//! Forwards warnings and errors to a channel owned by the application, e.g.
//! to surface them in a UI or a test harness.
//!
//! Run with: cargo run --example channel_hook

use rust_hook_logger::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Hook Logger - Channel Hook Example ===\n");

    let (tx, rx) = crossbeam_channel::bounded(32);

    let mut config = LogConfig::default();
    config.channel.enabled = true;
    config.channel.sender = Some(tx);
    config.channel.min_level = "warn".to_string();

    let logger = Logger::init(config)?;

    logger.info("not forwarded", &[]);
    logger.warn_async("cache miss rate high", &["rate", "0.42"]);
    logger.error_async("upstream timeout", &["service", "billing"]);
    logger.close().await;

    println!("\nReceived on the channel:");
    for line in rx.try_iter() {
        println!("  {}", line);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
