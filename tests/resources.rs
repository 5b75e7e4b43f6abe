//! Resource client tests against wiremock.
//!
//! Checks paths, methods, query encoding and body wrapping for a sample of
//! resources from the table.

use std::collections::HashMap;

use ripsapi::{AuthHeaders, ClientConfig, ExportFormat, RipsClient, RipsError};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RipsClient {
    RipsClient::with_auth(
        &ClientConfig::new(server.uri()),
        AuthHeaders::Bearer("abc123".to_string()),
    )
    .unwrap()
}

/// Decoded form fields of the only request received.
async fn form_fields(server: &MockServer) -> HashMap<String, String> {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_get_all_uses_bearer_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let apps = client(&server)
        .applications
        .get_all(&[], &Value::Null)
        .await
        .unwrap();
    assert_eq!(apps, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_nested_filter_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/1/scans"))
        .and(query_param("notEqual[phase]", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .scans
        .get_all(&[1], &json!({"notEqual": {"phase": 1}, "limit": 10}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_comment_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/1/scans/2/issues/3/comments/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 4, "text": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let comment = client(&server)
        .comments
        .get_by_id(&[1, 2, 3], 4, &Value::Null)
        .await
        .unwrap();
    assert_eq!(comment["text"], "ok");
}

#[tokio::test]
async fn test_all_scans_and_stats() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/scans/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9}])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/applications/1/scans/stats"))
        .and(query_param("equal[id]", "9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.all_scans(&Value::Null).await.unwrap()[0]["id"], 9);
    assert_eq!(client.scan_stats(1, 9).await.unwrap()["issues"], 3);
}

#[tokio::test]
async fn test_empty_body_decodes_to_null() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client(&server)
        .settings
        .update_all(&[], &json!({"key": "value"}), &Value::Null)
        .await
        .unwrap();
    assert_eq!(result, Value::Null);
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_application_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "name": "shop"})))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .applications
        .create(&[], &json!({"name": "shop"}), &Value::Null)
        .await
        .unwrap();
    assert_eq!(created["id"], 3);

    let fields = form_fields(&server).await;
    assert_eq!(fields.get("application[name]").map(String::as_str), Some("shop"));
}

#[tokio::test]
async fn test_custom_ignore_nested_form_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/applications/1/customs/2/ignores/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .ignores
        .update(&[1, 2], 3, &json!({"path": "vendor/", "test": "input"}), &Value::Null)
        .await
        .unwrap();

    let fields = form_fields(&server).await;
    assert_eq!(fields.get("ignore[path]").map(String::as_str), Some("vendor/"));
    assert_eq!(fields.get("ignore[test]").map(String::as_str), Some("input"));
}

#[tokio::test]
async fn test_create_sink_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/applications/1/customs/2/sinks"))
        .and(header("Content-Type", "application/json"))
        .and(wiremock::matchers::body_json(json!({
            "sink": {"class": "Db", "method": "query"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let sink = client(&server)
        .sinks
        .create(&[1, 2], &json!({"class": "Db", "method": "query"}), &Value::Null)
        .await
        .unwrap();
    assert_eq!(sink["id"], 5);
}

#[tokio::test]
async fn test_delete_by_id_and_filtered_delete_all() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/applications/1/scans/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/applications/1/scans"))
        .and(query_param("lessThan[id]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.scans.delete_by_id(&[1], 2, &Value::Null).await.unwrap();
    client
        .scans
        .delete_all(&[1], &json!({"lessThan": {"id": 2}}))
        .await
        .unwrap();
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_api_error_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"code": 404, "message": "Not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .applications
        .get_by_id(&[], 404, &Value::Null)
        .await
        .unwrap_err();

    match err {
        RipsError::ApiError {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_parent_count_makes_no_request() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client.issues.get_all(&[1], &Value::Null).await.unwrap_err();
    assert!(matches!(err, RipsError::InvalidPath(_)));

    let err = client.scans.get_by_id(&[1], 0, &Value::Null).await.unwrap_err();
    assert!(matches!(err, RipsError::InvalidId));

    assert!(server.received_requests().await.unwrap().is_empty());
}

// =============================================================================
// Exports
// =============================================================================

#[tokio::test]
async fn test_export_writes_file() {
    let server = MockServer::start().await;
    let csv = "id,type\n1,xss\n";

    Mock::given(method("GET"))
        .and(path("/applications/1/scans/2/exports/jiracsvs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("issues.csv");

    let written = client(&server)
        .export(1, 2, ExportFormat::JiraCsv, &out, &Value::Null)
        .await
        .unwrap();

    assert_eq!(written, csv.len() as u64);
    assert_eq!(std::fs::read_to_string(&out).unwrap(), csv);
}

#[tokio::test]
async fn test_failed_export_writes_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/1/scans/2/exports/pdfs"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.pdf");

    let err = client(&server)
        .export(1, 2, ExportFormat::Pdf, &out, &Value::Null)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(403));
    assert!(!out.exists());
}
