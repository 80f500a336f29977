//! Axum middleware things
//!

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Allows the configured origin, or any origin when none is configured.
pub fn corslayer(origin: Option<HeaderValue>) -> CorsLayer {
    let allow_origin = match origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(allow_origin)
}
