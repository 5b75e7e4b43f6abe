//! OAuth2 token models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token endpoint response.
///
/// Only `access_token` is interpreted; every other field is kept so the
/// payload can be written back to the token cache unchanged.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPayload {
    /// The bearer token.
    pub access_token: String,

    /// Remaining fields (`expires_in`, `token_type`, `refresh_token`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPayload")
            .field("access_token", &"<redacted>")
            .field("fields", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TokenPayload {
    /// A payload holding just a token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            extra: Map::new(),
        }
    }

    /// Lifetime in seconds reported by the server, if any.
    pub fn expires_in(&self) -> Option<u64> {
        self.extra.get("expires_in").and_then(Value::as_u64)
    }
}

/// Password grant request sent to the token endpoint.
#[derive(Serialize)]
pub struct PasswordGrant<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> PasswordGrant<'a> {
    pub fn new(client_id: &'a str, username: &'a str, password: &'a str) -> Self {
        Self {
            grant_type: "password",
            client_id,
            username,
            password,
        }
    }
}
