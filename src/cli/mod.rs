//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the ripsapi binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::{ClientConfig, ExportFormat, OAuth2Config};

/// RIPS API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "ripsapi", about = "RIPS API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where and how to connect.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URI of the RIPS API.
    #[arg(long, env = "RIPS_BASE_URI", global = true, default_value = "http://localhost:8080")]
    pub base_uri: String,

    /// API username.
    #[arg(long, env = "RIPS_USERNAME", global = true)]
    pub username: Option<String>,

    /// API password.
    #[arg(long, env = "RIPS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// OAuth2 client id. Enables OAuth2 authentication.
    #[arg(long, env = "RIPS_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// Pre-issued OAuth2 access token. Enables OAuth2 authentication.
    #[arg(long, env = "RIPS_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Token cache file. Enables OAuth2 authentication.
    #[arg(long, env = "RIPS_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Write newly minted tokens to the token file.
    #[arg(long, env = "RIPS_STORE_TOKEN", global = true)]
    pub store_token: bool,

    /// Request timeout in seconds.
    #[arg(long, env = "RIPS_TIMEOUT", global = true, default_value_t = 100)]
    pub timeout: u64,
}

impl ConnectionArgs {
    /// Client configuration described by the flags.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.base_uri);
        config.timeout = Duration::from_secs(self.timeout);

        if self.client_id.is_some()
            || self.access_token.is_some()
            || self.token_file.is_some()
            || self.store_token
        {
            config.oauth2 = Some(OAuth2Config {
                access_token: self.access_token.clone(),
                client_id: self.client_id.clone(),
                token_file_path: self.token_file.clone(),
                store_token: self.store_token,
            });
        }

        config
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the server status and the authenticated user.
    Status,

    /// Authenticate and report which credentials would be used.
    Token,

    /// List a resource collection.
    List {
        /// Resource name, e.g. `applications`, `scans`, `sinks`.
        resource: String,

        /// Parent ids in path order, e.g. `<app> <scan>` for issues.
        parents: Vec<u64>,

        /// Query parameter as `key=value`; nested keys use brackets,
        /// e.g. `notEqual[phase]=1`.
        #[arg(long = "query", short = 'q', value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// Get a single item.
    Get {
        /// Resource name.
        resource: String,

        /// Parent ids followed by the item id.
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Delete one item, or the whole (filtered) collection with `--all`.
    Delete {
        /// Resource name.
        resource: String,

        /// Parent ids, followed by the item id unless `--all` is given.
        ids: Vec<u64>,

        /// Delete every item of the collection.
        #[arg(long)]
        all: bool,

        /// Query parameter as `key=value`.
        #[arg(long = "query", short = 'q', value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },

    /// Wait for a scan to finish.
    WaitScan {
        application: u64,
        scan: u64,

        /// Give up after this many seconds (0 waits forever).
        #[arg(long, default_value_t = 0)]
        wait: u64,

        /// Seconds between checks.
        #[arg(long, default_value_t = 5)]
        sleep: u64,
    },

    /// Export scan results to a file.
    Export {
        application: u64,
        scan: u64,

        /// Export format: csv, jira-csv or pdf.
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Destination file.
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

/// Parse `key=value`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Turn `key=value` pairs into a (possibly nested) query document.
///
/// `notEqual[phase]=1` becomes `{"notEqual": {"phase": "1"}}`. Keys use the
/// same bracket notation that requests are encoded with.
pub fn query_from_pairs(pairs: &[(String, String)]) -> crate::Result<Value> {
    if pairs.is_empty() {
        return Ok(Value::Null);
    }

    let query = pairs
        .iter()
        .map(|(key, value)| {
            let key: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
            let value: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            format!("{key}={value}")
        })
        .collect::<Vec<_>>()
        .join("&");

    // Non-strict so percent-encoded brackets still split keys
    let map: Map<String, Value> = serde_qs::Config::new(5, false).deserialize_str(&query)?;
    Ok(Value::Object(map))
}
