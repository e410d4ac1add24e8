//! Server settings loaded from environment variables with development
//! defaults. Values are kept raw where parsing can fail and checked by the
//! accessor that needs them, so a bad variable surfaces as a startup error.

use crate::error::{ApiError, ApiResult};
use linkfield_core::{ConfigError, ContentKind, ContentTypeRegistry};
use linkfield_store::DEFAULT_MAX_RESULTS;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind host (`LINKFIELD_API_BIND`).
    pub bind_host: String,

    /// Port as given (`PORT` or `LINKFIELD_API_PORT`).
    pub port: String,

    /// `LINKFIELD_CORS_ORIGINS`, comma separated; empty accepts any origin.
    pub cors_origins: Vec<String>,

    /// Seconds a browser may cache a preflight answer.
    pub cors_max_age_secs: u64,

    /// Type aliases searchable through this server. Empty means all nine.
    pub enabled_types: Vec<String>,

    /// Page bound for listings that name no page size.
    pub max_results: usize,

    /// JSON fixture loaded into the in-memory store.
    pub fixture_path: Option<PathBuf>,

    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: "3000".to_string(),
            cors_origins: Vec::new(),
            cors_max_age_secs: 24 * 60 * 60,
            enabled_types: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
            fixture_path: None,
            log_json: false,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `LINKFIELD_API_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `LINKFIELD_API_PORT`: Listen port (default: 3000)
    /// - `LINKFIELD_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `LINKFIELD_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `LINKFIELD_ENABLED_TYPES`: Comma-separated type aliases (default: all)
    /// - `LINKFIELD_MAX_RESULTS`: Listing bound (default: 50)
    /// - `LINKFIELD_FIXTURE`: Path to a JSON store fixture (default: empty store)
    /// - `LINKFIELD_LOG_FORMAT`: "json" for JSON logs (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_host = lookup("LINKFIELD_API_BIND")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_host);

        let port = lookup("PORT")
            .or_else(|| lookup("LINKFIELD_API_PORT"))
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.port);

        let cors_origins = lookup("LINKFIELD_CORS_ORIGINS")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        let cors_max_age_secs = lookup("LINKFIELD_CORS_MAX_AGE_SECS")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.cors_max_age_secs);

        let enabled_types = lookup("LINKFIELD_ENABLED_TYPES")
            .map(|s| split_list(&s))
            .unwrap_or_default();

        let max_results = lookup("LINKFIELD_MAX_RESULTS")
            .and_then(|s| s.trim().parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.max_results);

        let fixture_path = lookup("LINKFIELD_FIXTURE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let log_json = lookup("LINKFIELD_LOG_FORMAT")
            .map(|s| s.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            bind_host,
            port,
            cors_origins,
            cors_max_age_secs,
            enabled_types,
            max_results,
            fixture_path,
            log_json,
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let port = self
            .port
            .parse::<u16>()
            .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", self.port)))?;

        let addr = format!("{}:{}", self.bind_host, port);
        addr.parse::<SocketAddr>()
            .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
    }

    /// Registry of the enabled content types.
    ///
    /// With no restriction every kind is enabled and unknown aliases fall
    /// back to `post`. A restricted list keeps the `post` fallback only when
    /// `post` itself is enabled.
    pub fn registry(&self) -> Result<ContentTypeRegistry, ConfigError> {
        if self.enabled_types.is_empty() {
            return Ok(ContentTypeRegistry::standard());
        }

        let kinds = self
            .enabled_types
            .iter()
            .map(|alias| {
                alias.parse::<ContentKind>().map_err(|_| ConfigError::InvalidValue {
                    field: "LINKFIELD_ENABLED_TYPES".to_string(),
                    value: alias.clone(),
                    reason: "unknown content type".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let default = kinds.contains(&ContentKind::Post).then_some(ContentKind::Post);
        Ok(ContentTypeRegistry::restricted(kinds).with_default(default))
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            // Dev mode: allow all
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern))
                        || origin_domain == pattern;
                }
            }
            false
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.max_results, 50);
        assert_eq!(config.bind_addr().unwrap().to_string(), "0.0.0.0:3000");
        assert!(config.fixture_path.is_none());
        assert!(!config.log_json);
    }

    #[test]
    fn test_port_prefers_platform_variable() {
        let config = from_pairs(&[("PORT", "8080"), ("LINKFIELD_API_PORT", "9090")]);
        assert_eq!(config.bind_addr().unwrap().port(), 8080);

        let config = from_pairs(&[("LINKFIELD_API_PORT", "9090")]);
        assert_eq!(config.bind_addr().unwrap().port(), 9090);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let config = from_pairs(&[("PORT", "not-a-port")]);
        assert!(config.bind_addr().is_err());
    }

    #[test]
    fn test_lists_and_flags() {
        let config = from_pairs(&[
            ("LINKFIELD_CORS_ORIGINS", "https://a.test, ,https://b.test"),
            ("LINKFIELD_ENABLED_TYPES", "posts,users"),
            ("LINKFIELD_MAX_RESULTS", "20"),
            ("LINKFIELD_FIXTURE", "/tmp/site.json"),
            ("LINKFIELD_LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(config.cors_origins, vec!["https://a.test", "https://b.test"]);
        assert_eq!(config.enabled_types, vec!["posts", "users"]);
        assert_eq!(config.max_results, 20);
        assert_eq!(config.fixture_path, Some(PathBuf::from("/tmp/site.json")));
        assert!(config.log_json);
    }

    #[test]
    fn test_zero_max_results_keeps_default() {
        let config = from_pairs(&[("LINKFIELD_MAX_RESULTS", "0")]);
        assert_eq!(config.max_results, 50);
    }

    #[test]
    fn test_registry_restriction() {
        let registry = ApiConfig::default().registry().unwrap();
        assert_eq!(registry.kinds().count(), 9);

        let registry = from_pairs(&[("LINKFIELD_ENABLED_TYPES", "users,menus")])
            .registry()
            .unwrap();
        assert_eq!(registry.lookup("user"), Some(ContentKind::User));
        assert_eq!(registry.lookup("post"), None);
        assert_eq!(registry.default_kind(), None);

        let registry = from_pairs(&[("LINKFIELD_ENABLED_TYPES", "posts,pages")])
            .registry()
            .unwrap();
        assert_eq!(registry.default_kind(), Some(ContentKind::Post));
    }

    #[test]
    fn test_registry_rejects_unknown_alias() {
        let err = from_pairs(&[("LINKFIELD_ENABLED_TYPES", "posts,widgets")])
            .registry()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { value, .. } if value == "widgets"));
    }

    #[test]
    fn test_origin_allowed() {
        assert!(ApiConfig::default().is_origin_allowed("https://anything.test"));

        let mut config = ApiConfig::default();
        config.cors_origins = vec!["https://admin.test".to_string(), "*.site.test".to_string()];
        assert!(config.is_origin_allowed("https://admin.test"));
        assert!(config.is_origin_allowed("https://cms.site.test"));
        assert!(config.is_origin_allowed("https://site.test"));
        assert!(!config.is_origin_allowed("https://evilsite.test"));
        assert!(!config.is_origin_allowed("https://other.test"));
    }
}
