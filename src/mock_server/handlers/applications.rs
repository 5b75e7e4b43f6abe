//! Application endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;

use super::{body_fields, not_found, unauthorized};
use crate::mock_server::state::MockState;

/// GET /applications
pub async fn list_applications(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    let applications: Vec<Value> = state.applications.values().cloned().collect();
    (StatusCode::OK, Json(applications)).into_response()
}

/// POST /applications
pub async fn create_application(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    let fields = body_fields(&headers, &body, "application");
    (StatusCode::CREATED, Json(state.create_application(fields))).into_response()
}

/// GET /applications/{id}
pub async fn get_application(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    match state.applications.get(&id) {
        Some(application) => (StatusCode::OK, Json(application.clone())).into_response(),
        None => not_found("Application"),
    }
}

/// PATCH /applications/{id}
pub async fn update_application(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    let fields = body_fields(&headers, &body, "application");
    match state.update_application(id, fields) {
        Some(application) => (StatusCode::OK, Json(application.clone())).into_response(),
        None => not_found("Application"),
    }
}

/// DELETE /applications/{id}
pub async fn delete_application(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    match state.applications.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("Application"),
    }
}

/// DELETE /applications
pub async fn delete_applications(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    state.applications.clear();
    StatusCode::NO_CONTENT.into_response()
}
