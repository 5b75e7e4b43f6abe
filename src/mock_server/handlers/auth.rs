//! Status and OAuth2 token endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

/// Password grant body.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
}

/// GET /status
///
/// Reports the authenticated user, or `null` when the credentials are unknown.
pub async fn get_status(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.write().await;
    state.status_requests += 1;

    let user = state
        .authenticate(&headers)
        .map(|username| json!({ "username": username }));

    (
        StatusCode::OK,
        Json(json!({ "user": user, "version": "mock" })),
    )
}

/// POST /oauth/v2/token
pub async fn create_token(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(request): Json<TokenRequest>,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if request.grant_type != "password" {
        state.token_requests += 1;
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "unsupported_grant_type",
                "message": "Only the password grant is supported"
            })),
        );
    }

    match state.issue_token(&request.client_id, &request.username, &request.password) {
        Some(token) => (
            StatusCode::OK,
            Json(json!({
                "access_token": token,
                "expires_in": 3600,
                "token_type": "bearer",
                "scope": null,
            })),
        ),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "message": "Invalid username and password combination"
            })),
        ),
    }
}
