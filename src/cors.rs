//! CORS layer backed by the origin allow-list.
//!
//! The allow-list decides; `tower-http` does the header work:
//!
//! - authorized origin → reflected in `Access-Control-Allow-Origin`,
//!   with the fixed method and header lists on preflight.
//! - rejected or absent origin → no allow headers at all, so the browser
//!   blocks the response. There is no error status for rejection.
//!
//! The layer wraps every response, error responses included, so an
//! authorized caller still sees the CORS headers (and can read the error
//! body) when a handler fails.

use axum::http::{header, request::Parts, HeaderName, HeaderValue, Method};
use axum::response::Response;
use content_gate_core::OriginAllowList;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

pub const ALLOWED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::AUTHORIZATION,
    header::ORIGIN,
    header::ACCEPT,
];

/// Build the CORS layer for the API router.
pub fn cors_layer(allow: Arc<OriginAllowList>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                let origin = origin.to_str().ok();
                let allowed = allow.validate(origin).is_some();
                if !allowed {
                    tracing::debug!(origin = ?origin, "cross-origin request not allowed");
                }
                allowed
            },
        ))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
}

/// Drop preflight allow headers from responses that did not authorize the
/// origin.
///
/// `tower-http` advertises methods and headers on every preflight, even
/// when it withholds `Access-Control-Allow-Origin`. A rejected caller should
/// learn nothing, so those headers are removed here.
pub async fn strip_unauthorized(mut response: Response) -> Response {
    let headers = response.headers_mut();
    if !headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        headers.remove(header::ACCESS_CONTROL_ALLOW_METHODS);
        headers.remove(header::ACCESS_CONTROL_ALLOW_HEADERS);
        headers.remove(header::ACCESS_CONTROL_MAX_AGE);
    }
    response
}

/// `cgate check-origin`: evaluate the configured allow-list for one origin.
///
/// Prints the origin that would be reflected, or `rejected`.
pub fn run_check_origin(config: &Config, origin: Option<&str>) -> anyhow::Result<()> {
    let allow = config.origin_allow_list()?;

    match allow.validate(origin) {
        Some(reflected) => println!("allowed: {}", reflected),
        None => println!("rejected"),
    }

    Ok(())
}
