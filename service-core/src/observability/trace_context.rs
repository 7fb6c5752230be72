//! W3C Trace Context propagation for outbound service calls.
//!
//! Formats the current span's context as `traceparent`/`tracestate` headers
//! so downstream services (and the directory API gateway) can correlate
//! requests. See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject the current trace context into outbound HTTP request headers.
///
/// A no-op when the current span carries no valid OpenTelemetry context
/// (e.g. when tracing was initialized without an OTLP exporter).
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if span_context.is_valid() {
        // version-trace_id-span_id-trace_flags; version is always "00"
        let traceparent = format!(
            "00-{}-{}-{:02x}",
            span_context.trace_id(),
            span_context.span_id(),
            span_context.trace_flags().to_u8()
        );

        if let Ok(value) = traceparent.parse() {
            headers.insert(TRACEPARENT_HEADER, value);
        }

        let tracestate = span_context.trace_state().header();
        if !tracestate.is_empty() {
            if let Ok(value) = tracestate.parse() {
                headers.insert(TRACESTATE_HEADER, value);
            }
        }
    }
}

/// Inject trace context plus an explicit correlation id.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: Option<&str>) {
    inject_trace_context(headers);

    if let Some(id) = request_id {
        if let Ok(value) = id.parse() {
            headers.insert(REQUEST_ID_HEADER, value);
        }
    }
}

/// Extract the correlation id from incoming request headers.
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
