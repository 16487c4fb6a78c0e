//! Paginated record collection
//!
//! The API paginates with an opaque `x-next-page` header: each page's
//! response names the next page's URL, and the final page omits the
//! header. The collector walks that cursor, accumulates normalized
//! records in arrival order, and stops on exhaustion or on the caller's
//! item cap. Page-number arithmetic is deliberately absent; only the
//! server-supplied reference is trusted.

pub mod normalize;

use crate::error::Result;
use crate::http::{header_str, ApiClient, ApiRequest, RateLimitInfo};
use crate::params::Params;
use crate::types::{JsonValue, Method};
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the next-page reference
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Fixed delay between pages when quota is healthy
const PAGE_DELAY: Duration = Duration::from_millis(100);

/// How many records a collection returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Follow pages until the server reports no more
    All,
    /// Stop as soon as this many records have accumulated
    Limit(usize),
}

impl FetchPolicy {
    /// Item cap used when the caller asks for a bounded fetch without
    /// naming one
    pub const DEFAULT_LIMIT: usize = 100;

    /// Read the policy from a resolved parameter bag: `returnAll`
    /// (default false) and, only when false, `limit` (default 100).
    pub fn from_params(params: &Params) -> Self {
        if params.bool_or(&["returnAll", "return_all"], false) {
            Self::All
        } else {
            Self::Limit(params.usize_or(&["limit"], Self::DEFAULT_LIMIT))
        }
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::Limit(Self::DEFAULT_LIMIT)
    }
}

/// Fetch every record for a query by walking the next-page cursor.
///
/// The initial query is sent only on the first page; later pages use the
/// server's next-page reference verbatim (minus the base-endpoint
/// prefix), since it already encodes the query. Records arrive in server
/// delivery order and are never reordered or deduplicated. A failure on
/// any page aborts the whole collection; partial results are discarded.
pub async fn collect(
    client: &ApiClient,
    method: Method,
    path: &str,
    body: JsonValue,
    query: Vec<(String, String)>,
    policy: FetchPolicy,
) -> Result<Vec<JsonValue>> {
    let mut records = Vec::new();
    let mut next_path = path.to_string();
    let mut page: usize = 0;

    loop {
        let mut request = ApiRequest::new(method, &next_path).json(body.clone());
        if page == 0 {
            for (key, value) in &query {
                request = request.query(key.as_str(), value.as_str());
            }
        }

        let response = client.request_full(&request).await?;
        let page_records = normalize::records(response.body);
        debug!(page, count = page_records.len(), "collected page");
        records.extend(page_records);

        if let FetchPolicy::Limit(limit) = policy {
            if records.len() >= limit {
                records.truncate(limit);
                return Ok(records);
            }
        }

        let Some(next) = header_str(&response.headers, NEXT_PAGE_HEADER) else {
            return Ok(records);
        };
        next_path = strip_base(next, client.base_url());

        let info = RateLimitInfo::from_headers(&response.headers);
        if let Some(wait) = info.throttle_wait(Utc::now().timestamp()) {
            warn!(?wait, remaining = ?info.remaining, "quota low, waiting out the window");
            tokio::time::sleep(wait).await;
        } else if page > 0 {
            tokio::time::sleep(PAGE_DELAY).await;
        }

        page += 1;
    }
}

/// Convenience wrapper: read the fetch policy from a parameter bag
pub async fn collect_with_params(
    client: &ApiClient,
    method: Method,
    path: &str,
    body: JsonValue,
    query: Vec<(String, String)>,
    params: &Params,
) -> Result<Vec<JsonValue>> {
    collect(client, method, path, body, query, FetchPolicy::from_params(params)).await
}

/// Strip the resolved base endpoint from a next-page reference so the
/// next iteration dispatches relative to the same base.
fn strip_base(next: &str, base_url: &str) -> String {
    next.strip_prefix(base_url).unwrap_or(next).to_string()
}
