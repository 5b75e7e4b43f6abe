//! Mock RIPS API server.
//!
//! Provides an axum-based HTTP server that simulates the RIPS API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock RIPS API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be inspected or modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with the default scenario.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_scenario()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Base URL to use as `ClientConfig::base_uri`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Number of token requests received so far.
    pub async fn token_requests(&self) -> usize {
        self.state.read().await.token_requests
    }

    /// Number of status requests received so far.
    pub async fn status_requests(&self) -> usize {
        self.state.read().await.status_requests
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            .route("/status", get(handlers::get_status))
            .route("/oauth/v2/token", post(handlers::create_token))
            .route(
                "/applications",
                get(handlers::list_applications)
                    .post(handlers::create_application)
                    .delete(handlers::delete_applications),
            )
            .route(
                "/applications/:id",
                get(handlers::get_application)
                    .patch(handlers::update_application)
                    .delete(handlers::delete_application),
            )
            .route(
                "/applications/:id/scans/:scan",
                get(handlers::get_scan),
            )
            .route(
                "/applications/:id/scans/:scan/exports/:format",
                get(handlers::export_scan),
            )
            .route(
                "/logs",
                get(handlers::list_logs).post(handlers::create_log),
            )
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfig, RipsClient};
    use serde_json::Value;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let response = reqwest::Client::new()
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_basic_auth_lists_applications() {
        let server = MockServer::start().await;
        let client = RipsClient::connect("alice", "secret", ClientConfig::new(server.url()))
            .await
            .unwrap();

        let apps = client.applications.get_all(&[], &Value::Null).await.unwrap();
        assert_eq!(apps.as_array().map(Vec::len), Some(2));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected() {
        let server = MockServer::start().await;
        let client = RipsClient::connect("mallory", "guess", ClientConfig::new(server.url()))
            .await
            .unwrap();

        let err = client
            .applications
            .get_all(&[], &Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(401));

        server.shutdown().await;
    }
}
