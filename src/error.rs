//! Error types for crm-connect
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Two failure shapes reach callers from the request path: a wrapped API
//! error carrying the originating operation's identity, and a fixed
//! rate-limit-exhausted error.

use thiserror::Error;

/// The main error type for crm-connect
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any non-429 request failure, wrapping the original error payload
    /// and the operation that issued the request.
    #[error("API request for '{operation}' failed: {message}")]
    Api {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// The 429 retry budget is spent.
    #[error("Rate limited: maximum retries reached")]
    RateLimitExceeded,

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a wrapped API error for the given operation
    pub fn api(operation: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Check if this error is the exhausted-retry rate-limit failure
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded)
    }
}

/// Result type alias for crm-connect
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing api key");
        assert_eq!(err.to_string(), "Configuration error: missing api key");

        let err = Error::api("contact.getAll", Some(404), "Not found");
        assert_eq!(
            err.to_string(),
            "API request for 'contact.getAll' failed: Not found"
        );
    }

    #[test]
    fn test_rate_limit_message_is_fixed() {
        let err = Error::RateLimitExceeded;
        assert!(err.to_string().contains("maximum retries reached"));
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_api_error_carries_status() {
        let err = Error::api("deal.get", Some(500), "boom");
        match err {
            Error::Api { status, operation, .. } => {
                assert_eq!(status, Some(500));
                assert_eq!(operation, "deal.get");
            }
            _ => panic!("expected Api variant"),
        }
    }
}
