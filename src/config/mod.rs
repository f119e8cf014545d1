//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → consumed once at startup; never reloaded
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the process lifetime; changes require restart
//! - All fields have defaults so the binary runs with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::{
    BackendConfig, CorsConfig, ForwardConfig, HostStrategy, ListenerConfig, ObservabilityConfig,
    ProxyConfig, ServiceConfig, TlsConfig,
};
