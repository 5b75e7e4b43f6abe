//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use serde_json::{json, Value};

use super::state::MockState;

/// Username accepted by the default scenario.
pub const DEFAULT_USERNAME: &str = "alice";

/// Password accepted by the default scenario.
pub const DEFAULT_PASSWORD: &str = "secret";

/// OAuth2 client id accepted by the default scenario.
pub const DEFAULT_CLIENT_ID: &str = "rips-cli";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// Create an application document.
    pub fn application(name: &str) -> Value {
        json!({
            "name": name,
            "currentQuota": { "id": 1 },
            "chargedQuota": { "id": 1 },
        })
    }

    /// Create a log entry.
    pub fn log(level: u8, message: &str) -> Value {
        json!({
            "type": level,
            "message": message,
            "host": "127.0.0.1",
        })
    }

    /// Create a complete test scenario.
    ///
    /// Contains one user with an OAuth2 client, two applications, a scan
    /// that finishes on its third check and a few log entries.
    pub fn default_scenario() -> MockState {
        MockState::new()
            .with_user(DEFAULT_USERNAME, DEFAULT_PASSWORD)
            .with_client_id(DEFAULT_CLIENT_ID)
            .with_application(1, Self::application("webshop"))
            .with_application(2, Self::application("blog"))
            .with_scan(1, 1, 2)
            .with_log(Self::log(1, "scan started"))
            .with_log(Self::log(3, "scan finished"))
    }
}
