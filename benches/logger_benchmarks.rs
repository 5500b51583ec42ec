//! Criterion benchmarks for rust_hook_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_hook_logger::prelude::*;
use rust_hook_logger::RecordBuilder;
use tokio::runtime::Runtime;

/// Appender that discards everything, so only the pipeline is measured
struct NullAppender;

impl Appender for NullAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        black_box(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_logger(runtime: &Runtime, min_level: LogLevel) -> Logger {
    Logger::builder()
        .runtime(runtime.handle().clone())
        .min_level(min_level)
        .appender(NullAppender)
        .exit_on_fatal(false)
        .build()
        .expect("benchmark logger")
}

// ============================================================================
// Record Building Benchmarks
// ============================================================================

fn bench_record_building(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_building");
    group.throughput(Throughput::Elements(1));

    let builder = RecordBuilder::new(Some("[bench]".to_string()));

    group.bench_function("no_fields", |b| {
        b.iter(|| black_box(builder.build::<&str>(LogLevel::Info, black_box("message"), &[])));
    });

    group.bench_function("four_fields", |b| {
        b.iter(|| {
            black_box(builder.build(
                LogLevel::Info,
                black_box("message"),
                &["user", "42", "route", "/api", "ms", "12", "status", "200"],
            ))
        });
    });

    let err = SErr::new("connection refused").with_attrs(&["host", "db", "port", "5432"]);
    group.bench_function("structured_error", |b| {
        b.iter(|| black_box(builder.build_from_error(&err, &["retry", "3"], "bench.rs:1")));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_sync_logging(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("sync_logging");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(&runtime, LogLevel::Trace);

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message"), &[]));
    });

    group.bench_function("info_with_fields", |b| {
        b.iter(|| logger.info(black_box("Info message"), &["key", "value", "n", "1"]));
    });

    group.finish();
    runtime.block_on(logger.close());
}

fn bench_filtered_logging(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("filtered_logging");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(&runtime, LogLevel::Error);

    group.bench_function("debug_below_threshold", |b| {
        b.iter(|| logger.debug(black_box("Filtered message"), &[]));
    });

    group.finish();
    runtime.block_on(logger.close());
}

fn bench_async_logging(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("async_logging");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("enqueue_and_drain_1000", |b| {
        b.iter(|| {
            let logger = null_logger(&runtime, LogLevel::Trace);
            for _ in 0..1000 {
                logger.info_async(black_box("Async message"), &["k", "v"]);
            }
            runtime.block_on(logger.close());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_record_building,
    bench_sync_logging,
    bench_filtered_logging,
    bench_async_logging
);
criterion_main!(benches);
