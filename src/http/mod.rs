//! HTTP dispatch module
//!
//! Provides the authenticated dispatcher with bounded 429 retry, the
//! rate-limit header signal, and an optional client-side token bucket.

mod client;
mod headers;
mod rate_limit;

pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use headers::{header_str, RateLimitInfo};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
