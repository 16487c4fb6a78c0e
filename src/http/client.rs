//! Authenticated request dispatcher
//!
//! Performs one logical request against the CRM API with credential
//! injection and bounded retry on HTTP 429. Every other failure is
//! wrapped and surfaced immediately with the calling operation's
//! identity attached.

use super::headers::RateLimitInfo;
use super::rate_limit::RateLimiter;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::Method;
use chrono::Utc;
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

/// One request descriptor: immutable for the duration of a call,
/// including across 429 retries.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the configured base endpoint (absolute URLs pass
    /// through untouched)
    pub path: String,
    /// JSON body; an empty object or null is not sent
    pub body: Value,
    /// Query parameters
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with an empty body and no query
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Object(serde_json::Map::new()),
            query: Vec::new(),
        }
    }

    /// Set the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    fn has_body(&self) -> bool {
        match &self.body {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

/// Full response shape: parsed body plus the headers the collector needs
/// for cursor and quota handling.
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body (null when the body was empty)
    pub body: Value,
}

/// Authenticated API client
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    limiter: Option<RateLimiter>,
    operation: String,
}

impl ApiClient {
    /// Create a client from a resolved config
    pub fn new(config: ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        let limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Self {
            client,
            config,
            limiter,
            operation: "request".to_string(),
        }
    }

    /// Label subsequent errors with the calling operation's identity
    #[must_use]
    pub fn for_operation(mut self, name: impl Into<String>) -> Self {
        self.operation = name.into();
        self
    }

    /// The resolved base endpoint this client dispatches against
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Make a GET request and return the parsed body
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(&ApiRequest::new(Method::GET, path)).await
    }

    /// Make a POST request with a JSON body and return the parsed body
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(&ApiRequest::new(Method::POST, path).json(body))
            .await
    }

    /// Dispatch a request and return the parsed response body
    pub async fn request(&self, request: &ApiRequest) -> Result<Value> {
        Ok(self.dispatch(request).await?.body)
    }

    /// Dispatch a request and return the full response (body + headers)
    pub async fn request_full(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(&request.path);
        // Total attempts, not retries after the first failure: three
        // 429s in a row exhaust the budget.
        let mut attempts_left = self.config.max_retries.max(1);

        loop {
            if let Some(ref limiter) = self.limiter {
                limiter.wait().await;
            }

            let mut req = self
                .client
                .request(request.method.into(), &url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");

            if !request.query.is_empty() {
                req = req.query(&request.query);
            }
            if request.has_body() {
                req = req.json(&request.body);
            }
            req = self.config.auth.apply(req);

            let response = match req.send().await {
                Ok(response) => response,
                Err(e) => return Err(Error::api(&self.operation, None, e.to_string())),
            };

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts_left -= 1;
                if attempts_left == 0 {
                    return Err(Error::RateLimitExceeded);
                }
                let wait = RateLimitInfo::from_headers(response.headers())
                    .retry_wait(Utc::now().timestamp());
                warn!(
                    operation = %self.operation,
                    ?wait,
                    attempts_left,
                    "rate limited (429), backing off"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::api(&self.operation, Some(status.as_u16()), body));
            }

            let headers = response.headers().clone();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => return Err(Error::api(&self.operation, None, e.to_string())),
            };
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };

            debug!(operation = %self.operation, %url, status = status.as_u16(), "request succeeded");
            return Ok(ApiResponse {
                status: status.as_u16(),
                headers,
                body,
            });
        }
    }

    /// Build the full URL: absolute references pass through, everything
    /// else is joined onto the resolved base endpoint.
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("operation", &self.operation)
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish_non_exhaustive()
    }
}
