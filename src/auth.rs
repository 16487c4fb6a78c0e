//! Credential injection
//!
//! The CRM authenticates every call with static credentials supplied at
//! client construction; there is no token refresh flow.

use reqwest::RequestBuilder;

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// API key placed in a request header
    ApiKey {
        /// Header name to carry the key
        header_name: String,
        /// Prefix to add before the value (e.g., "Bearer ")
        prefix: Option<String>,
        /// The API key value
        value: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl AuthConfig {
    /// API key in a header, no prefix
    pub fn api_key(header_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            header_name: header_name.into(),
            prefix: None,
            value: value.into(),
        }
    }

    /// Bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Apply these credentials to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::None => req,
            Self::ApiKey {
                header_name,
                prefix,
                value,
            } => {
                let val = format!("{}{}", prefix.as_deref().unwrap_or(""), value);
                req.header(header_name.as_str(), val)
            }
            Self::Basic { username, password } => req.basic_auth(username, Some(password)),
            Self::Bearer { token } => req.bearer_auth(token),
        }
    }
}
