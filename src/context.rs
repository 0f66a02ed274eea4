//! Request-scoped identifiers carried in an OpenTelemetry [`Context`]
//!
//! A trace id comes from the context's active span when that span is valid,
//! and otherwise from a value stored with [`context_with_trace_id`]. A
//! request id only comes from [`context_with_request_id`]. Empty strings
//! count as unset.
//!
//! ```
//! use opentelemetry::Context;
//! use rust_logger_facade::context;
//!
//! let cx = context::context_with_request_id(&Context::new(), "req-42");
//! let logger = context::from_context(&cx);
//! logger.info("handling request", &[]);
//! ```

use crate::core::{Field, Logger};
use crate::global;
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;
use std::sync::Arc;

/// Field key for the trace id.
pub const TRACE_ID_KEY: &str = "traceID";
/// Field key for the request id.
pub const REQUEST_ID_KEY: &str = "requestID";

#[derive(Debug, Clone)]
struct TraceIdValue(String);

#[derive(Debug, Clone)]
struct RequestIdValue(String);

/// A copy of `cx` carrying `trace_id`.
pub fn context_with_trace_id(cx: &Context, trace_id: impl Into<String>) -> Context {
    cx.with_value(TraceIdValue(trace_id.into()))
}

/// A copy of `cx` carrying `request_id`.
pub fn context_with_request_id(cx: &Context, request_id: impl Into<String>) -> Context {
    cx.with_value(RequestIdValue(request_id.into()))
}

/// Trace id of the active valid span, else the stored one, else `""`.
pub fn trace_id_from_context(cx: &Context) -> String {
    let span = cx.span();
    let span_context = span.span_context();
    if span_context.is_valid() {
        return span_context.trace_id().to_string();
    }

    cx.get::<TraceIdValue>()
        .map(|value| value.0.clone())
        .unwrap_or_default()
}

/// Stored request id, else `""`.
pub fn request_id_from_context(cx: &Context) -> String {
    cx.get::<RequestIdValue>()
        .map(|value| value.0.clone())
        .unwrap_or_default()
}

/// Identifier fields found in `cx`, trace id first.
fn context_fields(cx: &Context) -> Vec<Field> {
    let mut fields = Vec::with_capacity(2);

    let trace_id = trace_id_from_context(cx);
    if !trace_id.is_empty() {
        fields.push(Field::string(TRACE_ID_KEY, trace_id));
    }

    let request_id = request_id_from_context(cx);
    if !request_id.is_empty() {
        fields.push(Field::string(REQUEST_ID_KEY, request_id));
    }

    fields
}

/// `logger` with the identifiers in `cx` attached.
///
/// Returns `logger` itself when `cx` carries neither identifier.
pub fn attach_context(logger: Arc<Logger>, cx: &Context) -> Arc<Logger> {
    let fields = context_fields(cx);
    if fields.is_empty() {
        logger
    } else {
        Arc::new(logger.with(&fields))
    }
}

/// The global logger with the identifiers in `cx` attached.
///
/// When `cx` carries neither identifier this is the global logger instance
/// itself, so no derived logger is allocated.
pub fn from_context(cx: &Context) -> Arc<Logger> {
    attach_context(global::get_logger(), cx)
}

/// [`from_context`] over the thread's current context.
pub fn from_current_context() -> Arc<Logger> {
    from_context(&Context::current())
}
