//! Prefix route table.
//!
//! # Responsibilities
//! - Hold the configured prefix → port mapping in declaration order
//! - Resolve a request path to the first matching service
//! - Strip the matched prefix from the forwarded path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; config validation guarantees prefixes are not
//!   nested, so iteration order cannot change the outcome
//! - A path equal to the prefix matches, not just `prefix + "/"` children
//! - No regex, plain string comparison

use crate::config::ServiceConfig;

/// One routed service: a path prefix mapped to a backend port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixRoute {
    /// Service identifier for logging/metrics.
    pub name: String,

    /// Path prefix, without trailing slash (e.g. "/chatbot").
    pub prefix: String,

    /// Backend port the service listens on.
    pub port: u16,
}

/// The result of a successful route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The matched service.
    pub route: &'a PrefixRoute,

    /// The request path with the matched prefix removed. An empty
    /// remainder becomes `/`.
    pub stripped_path: String,
}

/// Ordered prefix → port mapping, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<PrefixRoute>,
}

impl RouteTable {
    /// Build the table from validated service configuration.
    pub fn from_config(services: &[ServiceConfig]) -> Self {
        let routes = services
            .iter()
            .map(|s| PrefixRoute {
                name: s.name.clone(),
                prefix: s.prefix.clone(),
                port: s.port,
            })
            .collect();
        Self { routes }
    }

    /// Resolve a request path to a service.
    ///
    /// A prefix matches when the path equals it exactly or continues past
    /// it with `/`. `/chatbot-old` is therefore not a match for `/chatbot`.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        for route in &self.routes {
            let Some(rest) = path.strip_prefix(route.prefix.as_str()) else {
                continue;
            };
            if !rest.is_empty() && !rest.starts_with('/') {
                continue;
            }
            let stripped_path = if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            };
            return Some(RouteMatch {
                route,
                stripped_path,
            });
        }
        None
    }

    /// The configured prefixes, in match order.
    pub fn prefixes(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.prefix.clone()).collect()
    }

    /// Human-readable hint for callers that missed every prefix.
    pub fn usage_hint(&self) -> String {
        format!(
            "Prefix your request path with {}",
            self.prefixes().join(" or ")
        )
    }

    /// Number of configured routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_config(&[
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
        ])
    }

    #[test]
    fn child_path_matches_and_strips_prefix() {
        let table = table();
        let m = table.match_path("/chatbot/health").unwrap();
        assert_eq!(m.route.port, 8000);
        assert_eq!(m.stripped_path, "/health");
    }

    #[test]
    fn exact_prefix_maps_to_root() {
        let table = table();
        let m = table.match_path("/chatbot").unwrap();
        assert_eq!(m.route.name, "chatbot");
        assert_eq!(m.stripped_path, "/");
    }

    #[test]
    fn trailing_slash_only_becomes_root() {
        let table = table();
        let m = table.match_path("/contact/").unwrap();
        assert_eq!(m.route.port, 3001);
        assert_eq!(m.stripped_path, "/");
    }

    #[test]
    fn deep_paths_keep_their_tail() {
        let table = table();
        let m = table.match_path("/contact/api/contact").unwrap();
        assert_eq!(m.route.name, "contact");
        assert_eq!(m.stripped_path, "/api/contact");
    }

    #[test]
    fn sibling_prefix_is_not_a_child() {
        let table = table();
        assert!(table.match_path("/chatbot-old/health").is_none());
    }

    #[test]
    fn unknown_path_does_not_match() {
        let table = table();
        assert!(table.match_path("/unknown").is_none());
        assert!(table.match_path("/").is_none());
    }

    #[test]
    fn prefixes_preserve_declaration_order() {
        let table = table();
        assert_eq!(table.prefixes(), vec!["/chatbot", "/contact"]);
        assert_eq!(
            table.usage_hint(),
            "Prefix your request path with /chatbot or /contact"
        );
    }
}
