//! Status endpoint model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Status {
    /// The authenticated user, `null` when the request carried no valid
    /// credentials.
    #[serde(default)]
    pub user: Option<Value>,

    /// Server version, if reported.
    #[serde(default)]
    pub version: Option<String>,

    /// Everything else the server sends.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Status {
    /// Whether the request was made by a logged-in user.
    pub fn is_logged_in(&self) -> bool {
        matches!(&self.user, Some(user) if !user.is_null())
    }
}
