//! Criterion benchmarks for rust_logger_facade

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use opentelemetry::Context;
use rust_logger_facade::prelude::*;
use rust_logger_facade::sinks::BufferSink;
use rust_logger_facade::LogEntry;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

fn buffered(format: OutputFormat, level: LogLevel) -> (Logger, BufferSink) {
    let buffer = BufferSink::new();
    let logger = Logger::builder()
        .min_level(level)
        .format(format)
        .stacktrace_level(None)
        .sink(buffer.clone())
        .build();
    (logger, buffer)
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("build_default_options", |b| {
        let options = Options::new();
        b.iter(|| black_box(Logger::build(black_box(&options))));
    });

    group.bench_function("derive_with_fields", |b| {
        let (logger, _buffer) = buffered(OutputFormat::Json, LogLevel::Info);
        let fields = [Field::string("service", "api"), Field::string("region", "eu")];
        b.iter(|| black_box(logger.with(black_box(&fields))));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    for (name, format) in [("json", OutputFormat::Json), ("console", OutputFormat::Console)] {
        let (logger, buffer) = buffered(format, LogLevel::Debug);

        group.bench_function(format!("{}_plain", name), |b| {
            b.iter(|| {
                logger.info(black_box("Info message"), &[]);
                buffer.clear();
            });
        });

        group.bench_function(format!("{}_fields", name), |b| {
            b.iter(|| {
                logger.info(
                    black_box("Request completed"),
                    &[
                        Field::string("method", "GET"),
                        Field::uint("status", 200),
                        Field::duration("elapsed", Duration::from_micros(1250)),
                    ],
                );
                buffer.clear();
            });
        });
    }

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let (logger, _buffer) = buffered(OutputFormat::Json, LogLevel::Error);

    group.bench_function("filtered_out", |b| {
        b.iter(|| {
            logger.debug(black_box("Filtered message"), &[Field::int("n", 1)]);
        });
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let (logger, buffer) = buffered(OutputFormat::Json, LogLevel::Info);
    let logger = Arc::new(logger);

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let logger = Arc::clone(&logger);
                    std::thread::spawn(move || {
                        logger.info(black_box("Concurrent message"), &[]);
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            buffer.clear();
        });
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    let entry = LogEntry::new(LogLevel::Info, "Benchmark message").with_fields(vec![
        Field::string("user", "alice"),
        Field::int("attempt", 3),
        Field::float("ratio", 0.75),
    ]);

    group.bench_function("json", |b| {
        b.iter(|| black_box(OutputFormat::Json.encode(black_box(&entry))));
    });

    group.bench_function("console", |b| {
        b.iter(|| black_box(OutputFormat::Console.encode(black_box(&entry))));
    });

    group.finish();
}

// ============================================================================
// Context and Adapter Benchmarks
// ============================================================================

fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");
    global::init([with_output_paths(Vec::<String>::new())]);

    let empty = Context::new();
    group.bench_function("from_context_empty", |b| {
        b.iter(|| black_box(context::from_context(black_box(&empty))));
    });

    let cx = context::context_with_trace_id(&Context::new(), "4bf92f3577b34da6a3ce929d0e0e4736");
    let cx = context::context_with_request_id(&cx, "req-1");
    group.bench_function("from_context_with_ids", |b| {
        b.iter(|| black_box(context::from_context(black_box(&cx))));
    });

    group.bench_function("framework_writer", |b| {
        let mut writer = framework_writer();
        b.iter(|| writer.write(black_box(b"GET /health 200\n")).unwrap());
    });

    global::reset();
    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_logger_creation,
    bench_logging,
    bench_level_filtering,
    bench_concurrent_logging,
    bench_encoding,
    bench_context
);

criterion_main!(benches);
