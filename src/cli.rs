//! Command-line interface
//!
//! A thin surface over the library for poking at an endpoint:
//!
//! - `fetch` - collect records across pages, one JSON object per line
//! - `get` - dispatch a single request and pretty-print the body

use crate::auth::AuthConfig;
use crate::collect::{self, FetchPolicy};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::types::{JsonValue, Method};
use clap::{Parser, Subcommand};

/// crm-connect CLI
#[derive(Parser, Debug)]
#[command(name = "crm-connect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base endpoint (wins over the CRM_API_BASE_URL override)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API key value
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Header carrying the API key
    #[arg(long, global = true, default_value = "X-Api-Key")]
    pub api_key_header: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect records from a paginated endpoint (NDJSON to stdout)
    Fetch {
        /// Endpoint path, e.g. /contacts
        #[arg(long)]
        path: String,

        /// Follow pages until the server reports no more
        #[arg(long, conflicts_with = "limit")]
        all: bool,

        /// Maximum records to return (default 100)
        #[arg(long)]
        limit: Option<usize>,

        /// Query parameters, repeatable
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,
    },

    /// Dispatch one request and pretty-print the response body
    Get {
        /// Resource path, e.g. /contacts/123
        #[arg(long)]
        path: String,
    },
}

/// Run the parsed CLI
pub async fn run(cli: Cli) -> Result<()> {
    let mut builder = ApiConfig::builder();
    if let Some(base) = &cli.base_url {
        builder = builder.base_url(base);
    }
    if let Some(key) = &cli.api_key {
        builder = builder.auth(AuthConfig::api_key(&cli.api_key_header, key));
    }
    let config = builder.build();

    match cli.command {
        Commands::Fetch {
            path,
            all,
            limit,
            query,
        } => {
            let client = ApiClient::new(config).for_operation("cli.fetch");
            let policy = if all {
                FetchPolicy::All
            } else {
                FetchPolicy::Limit(limit.unwrap_or(FetchPolicy::DEFAULT_LIMIT))
            };
            let query = parse_query(&query)?;
            let records =
                collect::collect(&client, Method::GET, &path, JsonValue::Null, query, policy)
                    .await?;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            tracing::info!(count = records.len(), "fetch complete");
        }

        Commands::Get { path } => {
            let client = ApiClient::new(config).for_operation("cli.get");
            let body = client.get(&path).await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

fn parse_query(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    Error::config(format!(
                        "invalid query parameter '{pair}', expected KEY=VALUE"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let parsed = parse_query(&["status=active".to_string(), "tag=vip".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("status".to_string(), "active".to_string()),
                ("tag".to_string(), "vip".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_query_rejects_bare_key() {
        assert!(parse_query(&["status".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::try_parse_from([
            "crm-connect",
            "fetch",
            "--path",
            "/contacts",
            "--all",
            "--query",
            "status=active",
        ])
        .unwrap();
        match cli.command {
            Commands::Fetch { path, all, .. } => {
                assert_eq!(path, "/contacts");
                assert!(all);
            }
            Commands::Get { .. } => panic!("expected fetch"),
        }
    }
}
