//! Scan endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::{error_response, not_found, unauthorized};
use crate::mock_server::state::MockState;

/// GET /applications/{app}/scans/{scan}
///
/// Each call moves the scan one step closer to completion.
pub async fn get_scan(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((application_id, scan_id)): Path<(u64, u64)>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }

    match state.poll_scan(application_id, scan_id) {
        Some(scan) => (StatusCode::OK, Json(scan)).into_response(),
        None => not_found("Scan"),
    }
}

/// GET /applications/{app}/scans/{scan}/exports/{format}
pub async fn export_scan(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((application_id, scan_id, format)): Path<(u64, u64, String)>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if state.authenticate(&headers).is_none() {
        return unauthorized();
    }
    if !state.scans.contains_key(&(application_id, scan_id)) {
        return not_found("Scan");
    }

    match format.as_str() {
        "csvs" | "jiracsvs" => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/csv")],
            format!("id,type,file\n1,xss,index.php\n2,sqli,app{application_id}/scan{scan_id}.php\n"),
        )
            .into_response(),
        "pdfs" => (
            StatusCode::OK,
            [(CONTENT_TYPE, "application/pdf")],
            b"%PDF-1.4\n%mock\n".to_vec(),
        )
            .into_response(),
        other => error_response(
            StatusCode::BAD_REQUEST,
            &format!("Unknown export format '{other}'"),
        ),
    }
}
