//! RIPS API client library.
//!
//! A Rust library for the REST API of the RIPS static analysis platform.
//! Authentication is resolved once when the client is built; afterwards
//! every resource (applications, scans, issues, custom rules, users, ...)
//! is reached through the same generic [`ResourceClient`].
//!
//! # Quick Start
//!
//! ```no_run
//! use ripsapi::{ClientConfig, OAuth2Config, RipsClient, WaitOptions};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> ripsapi::Result<()> {
//!     let config = ClientConfig::new("https://api.rips.example").with_oauth2(OAuth2Config {
//!         client_id: Some("my-client".to_string()),
//!         token_file_path: Some("/tmp/rips-token.json".into()),
//!         store_token: true,
//!         ..Default::default()
//!     });
//!     let client = RipsClient::connect("alice", "secret", config).await?;
//!
//!     // List applications
//!     let apps = client.applications.get_all(&[], &Value::Null).await?;
//!     println!("{apps}");
//!
//!     // Start a scan and wait for it
//!     let scan = client.start_scan(1, &json!({"version": "1.0"})).await?;
//!     let scan_id = scan["id"].as_u64().unwrap_or_default();
//!     client.block_until_done(1, scan_id, WaitOptions::default()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Without an `oauth2` block the client sends `X-API-Username` and
//! `X-API-Password`. With one, it uses a bearer token that is taken from
//! the configuration, read from the token cache file, or requested with
//! the password grant. See [`SessionManager`].
//!
//! # Configuration
//!
//! [`RipsClient::from_env`] reads:
//!
//! - `RIPS_USERNAME`, `RIPS_PASSWORD` (required)
//! - `RIPS_BASE_URI` (defaults to `http://localhost:8080`)
//! - `RIPS_TIMEOUT`, `RIPS_CONNECT_TIMEOUT` (seconds)
//! - `RIPS_CLIENT_ID`, `RIPS_ACCESS_TOKEN`, `RIPS_TOKEN_FILE`, `RIPS_STORE_TOKEN`

pub mod cli;
mod client;
mod config;
mod error;
mod models;
mod resource;
pub mod resources;
mod scan;
mod session;
mod token_store;
mod transport;
mod validator;

#[cfg(feature = "test-server")]
pub mod mock_server;

pub mod output;

// Re-export core types
pub use client::RipsClient;
pub use config::{ClientConfig, OAuth2Config};
pub use error::{Result, RipsError};
pub use resource::{check_response, decode, decode_as, BodyEncoding, ResourceClient, ResourceSpec};
pub use scan::{WaitOptions, DEFAULT_POLL_INTERVAL};
pub use session::{request_token, AuthHeaders, SessionManager, OAUTH2_TOKEN_PATH};
pub use token_store::TokenStore;
pub use transport::{RequestBody, Transport, VERSION};
pub use validator::TokenValidator;

// Re-export models
pub use models::{ExportFormat, PasswordGrant, ScanProgress, Status, TokenPayload};
