//! Edge reverse proxy for the NGT backend services.
//!
//! Receives every inbound request, resolves it to zero or one backend
//! service by first-match path-prefix lookup, rewrites the path, forwards
//! over plain HTTP to a fixed backend host, and relays the response with
//! CORS headers stamped on every exit path.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http/server ──▶ http/cors (preflight? answer 204)
//!                  │
//!                  ▼
//!              routing/table (first prefix match, strip path)
//!                  │ miss → 200 diagnostic payload
//!                  ▼
//!              upstream/target + upstream/headers
//!                  │
//!                  ▼
//!              hyper client ──▶ backend host:port
//!                  │ error → 502 { error, detail }
//!                  ▼
//!   Client ◀── downstream response + CORS overlay
//!
//!   Cross-cutting: config (load once, validate), observability
//!   (tracing + metrics), lifecycle (signals, graceful drain)
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
