//! Cross-origin policy applied to every response.
//!
//! # Responsibilities
//! - Resolve the caller's `Origin` against the configured allow-list
//! - Stamp the CORS header set on success, diagnostic, preflight and
//!   error responses alike
//! - Answer preflight requests before routing ever runs
//!
//! # Design Decisions
//! - An unlisted or absent origin gets the configured default origin, not
//!   a rejection; the header is always present and never reflects an
//!   unknown caller verbatim
//! - Headers overwrite whatever the downstream returned, so the policy at
//!   the edge is authoritative

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::CorsConfig;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";
const MAX_AGE: &str = "86400";

/// Immutable cross-origin policy, built once from configuration.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<String>,
    default_origin: HeaderValue,
}

impl CorsPolicy {
    /// Build the policy. Origins are validated as header-safe at config
    /// load; a malformed default falls back to the deployment's primary
    /// site rather than panicking.
    pub fn from_config(config: &CorsConfig) -> Self {
        let default_origin = HeaderValue::from_str(&config.default_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("https://nexgenteck.github.io"));
        Self {
            allowed: config.allowed_origins.clone(),
            default_origin,
        }
    }

    /// Resolve the `Origin` header into the value echoed back to the
    /// caller: the origin itself when allow-listed, the default otherwise.
    pub fn resolve_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        if let Some(value) = origin {
            if let Ok(origin) = value.to_str() {
                if self.allowed.iter().any(|allowed| allowed == origin) {
                    return value.clone();
                }
            }
        }
        self.default_origin.clone()
    }

    /// The full CORS header set for a resolved origin.
    pub fn headers(&self, origin: &HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        self.apply(&mut headers, origin);
        headers
    }

    /// Set (or overwrite) the CORS header set on an existing header map.
    pub fn apply(&self, headers: &mut HeaderMap, origin: &HeaderValue) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE));
    }

    /// Answer a CORS preflight: 204, empty body, CORS headers only.
    pub fn preflight(&self, origin: &HeaderValue) -> Response {
        (StatusCode::NO_CONTENT, self.headers(origin)).into_response()
    }
}
