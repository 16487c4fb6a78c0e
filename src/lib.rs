//! # crm-connect
//!
//! A client toolkit for a CRM REST API that paginates with an
//! `x-next-page` response header and signals quota through
//! `x-ratelimit-*` headers.
//!
//! Two cooperating pieces:
//!
//! - **Authenticated dispatcher** ([`http::ApiClient`]): one logical
//!   request with credential injection and bounded retry on HTTP 429.
//! - **Paginated collector** ([`collect::collect`]): walks the header
//!   cursor across pages, normalizes heterogeneous page payloads, honors
//!   a return-all-vs-limit policy, and throttles itself when the
//!   remaining quota runs low.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm_connect::{collect, ApiClient, ApiConfig, AuthConfig, FetchPolicy, Method, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ApiConfig::builder()
//!         .auth(AuthConfig::api_key("X-Api-Key", "secret"))
//!         .build();
//!     let client = ApiClient::new(config).for_operation("contact.getAll");
//!
//!     let contacts = collect::collect(
//!         &client,
//!         Method::GET,
//!         "/contacts",
//!         serde_json::Value::Null,
//!         vec![],
//!         FetchPolicy::All,
//!     )
//!     .await?;
//!
//!     println!("{} contacts", contacts.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration and base-endpoint resolution
pub mod config;

/// Credential injection
pub mod auth;

/// HTTP dispatch with retry and rate limiting
pub mod http;

/// Caller-supplied parameter bags with ordered candidate lookup
pub mod params;

/// Header-cursor pagination and record collection
pub mod collect;

/// Command-line interface
pub mod cli;

pub use auth::AuthConfig;
pub use collect::FetchPolicy;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use http::{ApiClient, ApiRequest, ApiResponse};
pub use params::Params;
pub use types::Method;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
