//! Request-scoped logging with trace and request ids
//!
//! Run with `cargo run --example context_logging`.

use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};
use opentelemetry::Context;
use rust_logger_facade::prelude::*;
use std::io::Write;
use std::time::{Duration, Instant};

fn handle_request(cx: &Context, path: &str) {
    let started = Instant::now();
    let logger = context::from_context(cx);

    logger.info("request started", &[Field::string("path", path)]);
    logger.debug("cache lookup", &[Field::bool("hit", false)]);
    logger.info(
        "request finished",
        &[
            Field::uint("status", 200),
            Field::duration("elapsed", started.elapsed()),
        ],
    );
}

fn main() -> Result<()> {
    global::init([with_level("debug"), with_format("json")]);

    // Identifiers set explicitly, e.g. from an incoming header.
    let cx = context::context_with_request_id(&Context::new(), "req-1001");
    let cx = context::context_with_trace_id(&cx, "manual-trace-id");
    handle_request(&cx, "/orders");

    // A valid span takes priority over a stored trace id.
    let span = SpanContext::new(
        TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").unwrap_or(TraceId::INVALID),
        SpanId::from_hex("00f067aa0ba902b7").unwrap_or(SpanId::INVALID),
        TraceFlags::SAMPLED,
        true,
        TraceState::default(),
    );
    let cx = cx.with_remote_span_context(span);
    handle_request(&cx, "/orders/42");

    // No identifiers: the global logger itself is used.
    handle_request(&Context::new(), "/health");

    // Framework output redirected into the same logger.
    let mut access_log = framework_writer();
    access_log
        .write_all(b"GET /health 200 1.2ms\n")
        .map_err(LoggerError::from)?;

    global::warn("shutting down", &[Field::duration("grace", Duration::from_secs(5))]);
    global::sync()
}
