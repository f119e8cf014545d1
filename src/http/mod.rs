//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, tracing layers)
//!     → cors.rs (preflight short-circuit, origin resolution)
//!     → [routing resolves service]
//!     → [upstream builds target URL + clean headers]
//!     → server.rs (forward, overlay CORS, relay or synthesize 502)
//! ```

pub mod cors;
pub mod request;
pub mod server;

pub use cors::CorsPolicy;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
