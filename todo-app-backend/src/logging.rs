//! Per-request tracing spans
//!

use std::time::Duration;

use axum::{
    http::{header::CONTENT_LENGTH, Request},
    response::Response,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier},
    trace::{MakeSpan, OnFailure, OnRequest, OnResponse, TraceLayer},
};
use tracing::{trace, warn, Span};

/// Opens one `request` span per call and fills in the outcome when the
/// response goes out.
#[derive(Copy, Clone, Default)]
pub(crate) struct RequestSpanner;

impl<B> MakeSpan<B> for RequestSpanner {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
            bytes = tracing::field::Empty,
        )
    }
}

impl<B> OnRequest<B> for RequestSpanner {
    fn on_request(&mut self, _request: &Request<B>, _span: &Span) {
        trace!("request received");
    }
}

impl<B> OnResponse<B> for RequestSpanner {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        span.record("status", response.status().as_u16());
        span.record("latency_ms", latency.as_millis() as u64);
        if let Some(content_length) = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
        {
            span.record("bytes", content_length);
        }
        tracing::event!(tracing::Level::INFO, "response sent");
    }
}

impl OnFailure<ServerErrorsFailureClass> for RequestSpanner {
    fn on_failure(&mut self, failure: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
        warn!(
            latency_ms = latency.as_millis() as u64,
            "request failed: {}", failure
        );
    }
}

pub(crate) type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpanner,
    RequestSpanner,
    RequestSpanner,
    tower_http::trace::DefaultOnBodyChunk,
    tower_http::trace::DefaultOnEos,
    RequestSpanner,
>;

pub(crate) fn logging_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpanner)
        .on_request(RequestSpanner)
        .on_response(RequestSpanner)
        .on_failure(RequestSpanner)
}
