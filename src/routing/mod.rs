//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → table.rs (first-match prefix lookup)
//!     → RouteMatch { service port, stripped path }   (hit)
//!     → None → diagnostic payload at the server layer (miss, not an error)
//! ```

pub mod table;

pub use table::{PrefixRoute, RouteMatch, RouteTable};
