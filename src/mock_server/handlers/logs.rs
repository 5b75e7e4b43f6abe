//! Log endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use super::{body_fields, unauthorized};
use crate::mock_server::state::MockState;

/// GET /logs
pub async fn list_logs(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    (StatusCode::OK, Json(state.logs.clone())).into_response()
}

/// POST /logs
pub async fn create_log(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    let entry = Value::Object(body_fields(&headers, &body, "log"));
    state.logs.push(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}
