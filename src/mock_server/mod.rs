//! Mock RIPS API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the parts of
//! the RIPS API the client relies on: status, the OAuth2 token endpoint,
//! applications, scan progress, exports and logs. Unlike wiremock which mocks
//! at the HTTP level per-test, this server keeps state across requests, so
//! token minting, validation and scan polling can be exercised end to end.
//!
//! # Example
//!
//! ```ignore
//! use ripsapi::mock_server::MockServer;
//! use ripsapi::{ClientConfig, OAuth2Config, RipsClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let config = ClientConfig::new(server.url()).with_oauth2(OAuth2Config {
//!         client_id: Some("rips-cli".to_string()),
//!         ..Default::default()
//!     });
//!
//!     let client = RipsClient::connect("alice", "secret", config).await.unwrap();
//!     assert!(client.is_logged_in().await.unwrap());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{Fixtures, DEFAULT_CLIENT_ID, DEFAULT_PASSWORD, DEFAULT_USERNAME};
pub use server::MockServer;
pub use state::{MockScan, MockState};
