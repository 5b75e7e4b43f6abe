//! Access token validation.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::models::Status;
use crate::resources;
use crate::transport::Transport;

/// Checks whether the service currently accepts a token.
///
/// Each check builds a throwaway [`Transport`] from the base configuration
/// plus the bearer header and probes the status endpoint once.
#[derive(Debug, Clone)]
pub struct TokenValidator<'a> {
    config: &'a ClientConfig,
}

impl<'a> TokenValidator<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// `true` iff the probe returns 2xx and a status document naming a user.
    ///
    /// A missing token is invalid without any network call. Transport
    /// failures count as invalid.
    #[tracing::instrument(skip_all)]
    pub async fn is_valid(&self, token: Option<&str>) -> bool {
        let Some(token) = token else {
            tracing::debug!("no token to validate");
            return false;
        };

        let mut headers = HeaderMap::new();
        let bearer = match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => value,
            Err(_) => {
                tracing::debug!("token is not a valid header value");
                return false;
            }
        };
        headers.insert(AUTHORIZATION, bearer);

        let transport = match Transport::new(self.config, headers) {
            Ok(transport) => transport,
            Err(e) => {
                tracing::debug!(error = %e, "could not build probe transport");
                return false;
            }
        };

        let response = match transport
            .send(Method::GET, resources::STATUS.path, &Value::Null, None)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "status probe failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), "token rejected");
            return false;
        }

        let valid = match response.json::<Status>().await {
            Ok(status) => status.is_logged_in(),
            Err(e) => {
                tracing::debug!(error = %e, "status probe returned no status document");
                false
            }
        };

        tracing::debug!(valid, "token probe finished");
        valid
    }
}
