//! Upstream addressing and forwarding policy.
//!
//! # Data Flow
//! ```text
//! RouteMatch { port, stripped path }
//!     → target.rs (resolve host strategy, build plain-HTTP URL)
//!     → headers.rs (clean outbound header set)
//!     → hyper client at the server layer (one call, no retries)
//! ```

pub mod headers;
pub mod target;

pub use headers::{build_forward_headers, X_FORWARDED_FOR};
pub use target::{build_target_url, UpstreamAddr};
