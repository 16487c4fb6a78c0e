//! Configuration for the API client
//!
//! The base endpoint is resolved exactly once, when a config is built,
//! and the resolved value feeds both request URL building and the
//! collector's next-page prefix stripping. Nothing here is a mutable
//! global: two clients built from different credentials can point at
//! different endpoints within the same process.

use crate::auth::AuthConfig;
use crate::http::RateLimiterConfig;
use std::time::Duration;

/// Default base endpoint for the CRM API
pub const DEFAULT_BASE_URL: &str = "https://api.crm.example.com/v1";

/// Environment variable that overrides the default base endpoint
pub const BASE_URL_ENV: &str = "CRM_API_BASE_URL";

/// Resolve the base endpoint: credential-supplied value first, then the
/// environment override, then the built-in default. Trailing slashes are
/// trimmed so path joining stays uniform.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    let raw = explicit
        .map(str::to_owned)
        .or_else(|| std::env::var(BASE_URL_ENV).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    raw.trim_end_matches('/').to_string()
}

/// Configuration for [`crate::ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Resolved base URL for all requests
    pub base_url: String,
    /// Credentials to inject into every request
    pub auth: AuthConfig,
    /// Request timeout
    pub timeout: Duration,
    /// Total attempts allowed for a rate-limited request
    pub max_retries: u32,
    /// User agent string
    pub user_agent: String,
    /// Client-side token bucket, applied before every attempt
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: resolve_base_url(None),
            auth: AuthConfig::None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            user_agent: format!("crm-connect/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

impl ApiConfig {
    /// Create a new config builder
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }
}

/// Builder for [`ApiConfig`]
#[derive(Default)]
pub struct ApiConfigBuilder {
    base_url: Option<String>,
    config: ApiConfig,
}

impl ApiConfigBuilder {
    /// Set an explicit base URL (wins over the environment override)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the credentials
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total attempts allowed for a rate-limited request
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the client-side rate limiter
    pub fn rate_limit(mut self, limit: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(limit);
        self
    }

    /// Disable client-side rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Build the config, resolving the base endpoint
    pub fn build(mut self) -> ApiConfig {
        self.config.base_url = resolve_base_url(self.base_url.as_deref());
        self.config
    }
}
