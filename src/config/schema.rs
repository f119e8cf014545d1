//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every section has defaults that reproduce the original deployment: two
//! services (`/chatbot` on 8000, `/contact` on 3001) behind one fixed
//! backend host, fronted for a known set of browser origins.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Service identity, reported by the diagnostic endpoint.
    pub name: String,

    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The fixed backend host every route forwards to.
    pub backend: BackendConfig,

    /// Routed services. Declaration order is match order.
    pub services: Vec<ServiceConfig>,

    /// Cross-origin policy applied to every response.
    pub cors: CorsConfig,

    /// Request forwarding policy.
    pub forward: ForwardConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            listener: ListenerConfig::default(),
            backend: BackendConfig::default(),
            services: default_services(),
            cors: CorsConfig::default(),
            forward: ForwardConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_name() -> String {
    "ngt-backend-proxy".to_string()
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration. When set, the listener terminates the
    /// caller's secure connection; forwarding is always plain HTTP.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// How the backend host is written into the outbound URL.
///
/// The deployment history carried several near-identical proxies differing
/// only in how they addressed the backend without tripping edge-platform
/// restrictions on direct-IP subrequests. Those variants collapse into one
/// strategy selected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HostStrategy {
    /// Use the configured address verbatim.
    LiteralAddress,

    /// Rewrite a literal IPv4 address into a wildcard-DNS hostname
    /// (e.g. `165.245.177.103` becomes `165-245-177-103.nip.io`), which
    /// resolves to the same host but satisfies no-direct-IP rules.
    #[default]
    DerivedHostname,

    /// Use the configured address verbatim but send an explicit `Host`
    /// header on the forwarded request.
    OverrideHostHeader,
}

/// The single backend host all routed traffic is forwarded to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend host address, typically a public IPv4 (e.g. "165.245.177.103").
    pub address: String,

    /// Hostname-resolution strategy for the outbound URL.
    pub host_strategy: HostStrategy,

    /// Wildcard-DNS suffix used by the `derived-hostname` strategy.
    pub derived_domain: String,

    /// Explicit `Host` header value used by the `override-host-header`
    /// strategy.
    pub override_host: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            address: "165.245.177.103".to_string(),
            host_strategy: HostStrategy::DerivedHostname,
            derived_domain: "nip.io".to_string(),
            override_host: String::new(),
        }
    }
}

/// One routed service: a path prefix mapped to a backend port.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service identifier for logging/metrics and env overrides.
    pub name: String,

    /// Path prefix to match (e.g. "/chatbot"). Stripped before forwarding.
    pub prefix: String,

    /// Backend port this service listens on.
    pub port: u16,
}

fn default_services() -> Vec<ServiceConfig> {
    vec![
        ServiceConfig {
            name: "chatbot".to_string(),
            prefix: "/chatbot".to_string(),
            port: 8000,
        },
        ServiceConfig {
            name: "contact".to_string(),
            prefix: "/contact".to_string(),
            port: 3001,
        },
    ]
}

/// Cross-origin policy.
///
/// The caller's `Origin` is echoed back when allow-listed; any other value
/// (including an absent header) gets `default_origin` instead. Unknown
/// callers are never reflected verbatim and never rejected outright.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origin strings permitted to be echoed back.
    pub allowed_origins: Vec<String>,

    /// Fixed fallback for absent or unlisted origins.
    pub default_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://nexgenteck.github.io".to_string(),
                "https://muhammadhasaan82.github.io".to_string(),
                "https://nex-gen-teck-github-io.vercel.app".to_string(),
                "https://nexgenteck.com".to_string(),
                "https://www.nexgenteck.com".to_string(),
                "http://localhost:5173".to_string(),
                "http://localhost:4173".to_string(),
            ],
            default_origin: "https://nexgenteck.github.io".to_string(),
        }
    }
}

/// Request forwarding policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Name of the edge-injected header carrying the caller's real network
    /// address. When present on the inbound request it is relayed to the
    /// backend as `X-Forwarded-For`.
    pub client_ip_header: String,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            client_ip_header: "cf-connecting-ip".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
