//! Mock server state management.
//!
//! Provides the in-memory data store for the mock RIPS API server.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use axum::http::HeaderMap;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

/// A scan whose progress advances each time it is fetched.
#[derive(Debug, Clone)]
pub struct MockScan {
    /// Scan document without progress fields.
    pub document: Value,
    /// Fetches left before the scan reports phase 0 / 100 %.
    pub polls_until_done: u32,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Accepted username/password pairs.
    pub users: HashMap<String, String>,

    /// Accepted OAuth2 client ids.
    pub client_ids: HashSet<String>,

    /// Issued bearer tokens and the user they belong to.
    pub tokens: HashMap<String, String>,

    /// Applications indexed by id.
    pub applications: BTreeMap<u64, Value>,

    /// Scans indexed by (application id, scan id).
    pub scans: HashMap<(u64, u64), MockScan>,

    /// Log entries in insertion order.
    pub logs: Vec<Value>,

    /// Number of token requests received.
    pub token_requests: usize,

    /// Number of status requests received.
    pub status_requests: usize,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Accept a username/password pair.
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.users.insert(username.to_string(), password.to_string());
        self
    }

    /// Accept an OAuth2 client id.
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_ids.insert(client_id.to_string());
        self
    }

    /// Accept a pre-issued token for `username`.
    pub fn with_token(mut self, token: &str, username: &str) -> Self {
        self.tokens.insert(token.to_string(), username.to_string());
        self
    }

    /// Add an application. Its `id` field is set to `id`.
    pub fn with_application(mut self, id: u64, mut application: Value) -> Self {
        if let Value::Object(ref mut map) = application {
            map.insert("id".to_string(), json!(id));
        }
        self.applications.insert(id, application);
        self.next_id = self.next_id.max(id);
        self
    }

    /// Add a scan that finishes after `polls_until_done` fetches.
    pub fn with_scan(mut self, application_id: u64, scan_id: u64, polls_until_done: u32) -> Self {
        self.scans.insert(
            (application_id, scan_id),
            MockScan {
                document: json!({ "id": scan_id, "application": { "id": application_id } }),
                polls_until_done,
            },
        );
        self
    }

    /// Add a log entry.
    pub fn with_log(mut self, entry: Value) -> Self {
        self.logs.push(entry);
        self
    }

    /// Resolve the user behind a request's credentials.
    ///
    /// Accepts either a known bearer token or a matching
    /// `X-API-Username` / `X-API-Password` pair.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<String> {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        if let Some(token) = header("authorization").and_then(|v| v.strip_prefix("Bearer ")) {
            return self.tokens.get(token).cloned();
        }

        let username = header("x-api-username")?;
        let password = header("x-api-password")?;
        (self.users.get(username).map(String::as_str) == Some(password))
            .then(|| username.to_string())
    }

    /// Issue a token for a password grant, if the grant is valid.
    pub fn issue_token(&mut self, client_id: &str, username: &str, password: &str) -> Option<String> {
        self.token_requests += 1;

        if !self.client_ids.contains(client_id)
            || self.users.get(username).map(String::as_str) != Some(password)
        {
            return None;
        }

        let token = format!("mock-token-{}", self.token_requests);
        self.tokens.insert(token.clone(), username.to_string());
        Some(token)
    }

    /// Create an application from its fields and return it.
    pub fn create_application(&mut self, fields: Map<String, Value>) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        let mut application = Value::Object(fields);
        application["id"] = json!(id);
        self.applications.insert(id, application.clone());
        application
    }

    /// Merge fields into an application.
    pub fn update_application(&mut self, id: u64, fields: Map<String, Value>) -> Option<&Value> {
        let application = self.applications.get_mut(&id)?;
        if let Value::Object(map) = &mut *application {
            map.extend(fields);
        }
        Some(application)
    }

    /// Fetch a scan, advancing its progress by one step.
    pub fn poll_scan(&mut self, application_id: u64, scan_id: u64) -> Option<Value> {
        let scan = self.scans.get_mut(&(application_id, scan_id))?;

        let (phase, percent) = if scan.polls_until_done == 0 {
            (0, 100)
        } else {
            scan.polls_until_done -= 1;
            (2, 50)
        };

        let mut document = scan.document.clone();
        document["phase"] = json!(phase);
        document["percent"] = json!(percent);
        Some(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_basic_authentication() {
        let state = MockState::new().with_user("alice", "secret");

        let mut headers = HeaderMap::new();
        headers.insert("x-api-username", HeaderValue::from_static("alice"));
        headers.insert("x-api-password", HeaderValue::from_static("secret"));
        assert_eq!(state.authenticate(&headers).as_deref(), Some("alice"));

        headers.insert("x-api-password", HeaderValue::from_static("wrong"));
        assert_eq!(state.authenticate(&headers), None);
    }

    #[test]
    fn test_issue_and_use_token() {
        let mut state = MockState::new()
            .with_user("alice", "secret")
            .with_client_id("cid");

        assert_eq!(state.issue_token("other", "alice", "secret"), None);
        let token = state.issue_token("cid", "alice", "secret").unwrap();
        assert_eq!(state.token_requests, 2);

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(state.authenticate(&headers).as_deref(), Some("alice"));
    }

    #[test]
    fn test_scan_progress_advances() {
        let mut state = MockState::new().with_scan(1, 5, 1);

        assert_eq!(state.poll_scan(1, 5).unwrap()["percent"], 50);
        let done = state.poll_scan(1, 5).unwrap();
        assert_eq!(done["phase"], 0);
        assert_eq!(done["percent"], 100);
        assert!(state.poll_scan(1, 6).is_none());
    }

    #[test]
    fn test_create_application_assigns_next_id() {
        let mut state = MockState::new().with_application(4, json!({"name": "old"}));

        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("new"));
        let created = state.create_application(fields);

        assert_eq!(created["id"], 5);
        assert_eq!(state.applications.len(), 2);
    }
}
