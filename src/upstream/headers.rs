//! Forwarded-request header policy.
//!
//! # Responsibilities
//! - Build the outbound header set from scratch; nothing is copied
//!   wholesale from the inbound request
//! - Pass through `Content-Type` and `Accept`, defaulting both to JSON
//! - Relay the edge-injected connecting-IP header as `X-Forwarded-For`
//!
//! # Design Decisions
//! - Starting from an empty set (rather than filtering the inbound one)
//!   means edge-internal diagnostic headers (ray IDs, visitor metadata,
//!   loop markers) can never leak to the backend
//! - The caller's `Host` is never forwarded; the outbound request is
//!   addressed by the explicit target URL, with an optional `Host`
//!   override for backends that require a specific virtual host

use axum::http::header::{ACCEPT, CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Header written on the outbound request with the caller's real address.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// Construct the header set for the forwarded request.
pub fn build_forward_headers(
    inbound: &HeaderMap,
    client_ip_header: &HeaderName,
    host_override: Option<&HeaderValue>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        CONTENT_TYPE,
        inbound
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(application_json),
    );
    headers.insert(
        ACCEPT,
        inbound.get(ACCEPT).cloned().unwrap_or_else(application_json),
    );

    if let Some(client_ip) = inbound.get(client_ip_header) {
        headers.insert(X_FORWARDED_FOR, client_ip.clone());
    }

    if let Some(host) = host_override {
        headers.insert(HOST, host.clone());
    }

    headers
}
