//! Session bootstrap.
//!
//! Decides how a client authenticates and produces the header set that is
//! baked into its transport:
//!
//! 1. Without an `oauth2` block, username and password are sent as
//!    `X-API-Username` / `X-API-Password` on every request.
//! 2. With `oauth2`, a pre-supplied `access_token` is used if present.
//! 3. Otherwise a token cached in `token_file_path` is used as-is, without
//!    validation.
//! 4. Otherwise a token is minted with the password grant (requires
//!    `client_id`) and, if `store_token` is set, written to the cache.
//!
//! Tokens from steps 2 and 4 are probed against the status endpoint before
//! they are accepted.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::Value;

use crate::config::{ClientConfig, OAuth2Config};
use crate::error::{Result, RipsError};
use crate::models::{PasswordGrant, TokenPayload};
use crate::resource::{decode, decode_as};
use crate::token_store::TokenStore;
use crate::transport::{header_map, RequestBody, Transport};
use crate::validator::TokenValidator;

/// Token endpoint, relative to the base URI.
pub const OAUTH2_TOKEN_PATH: &str = "oauth/v2/token";

/// Authentication headers for one client. Exactly one shape per client.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthHeaders {
    /// `X-API-Username` / `X-API-Password`.
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthHeaders::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            AuthHeaders::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

impl AuthHeaders {
    /// Header name/value pairs.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            AuthHeaders::Basic { username, password } => vec![
                ("X-API-Username", username.clone()),
                ("X-API-Password", password.clone()),
            ],
            AuthHeaders::Bearer(token) => vec![("Authorization", format!("Bearer {token}"))],
        }
    }

    /// Headers ready for a [`Transport`].
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let pairs = self.pairs();
        header_map(pairs.iter().map(|(name, value)| (*name, value.as_str())))
    }

    /// The bearer token, in OAuth2 mode.
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthHeaders::Bearer(token) => Some(token),
            AuthHeaders::Basic { .. } => None,
        }
    }
}

/// Produces the [`AuthHeaders`] for a client configuration.
#[derive(Debug, Clone)]
pub struct SessionManager<'a> {
    config: &'a ClientConfig,
}

impl<'a> SessionManager<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    /// Run the bootstrap and return the headers to use.
    ///
    /// # Errors
    ///
    /// - [`RipsError::ConfigMissing`] if a token must be minted without a
    ///   `client_id`, or a minted token must be stored without a path.
    /// - [`RipsError::AuthFailed`] if the candidate token is rejected.
    /// - [`RipsError::ApiError`] / [`RipsError::HttpError`] if the token
    ///   request itself fails.
    /// - [`RipsError::ParseError`] if the token endpoint answers 2xx without
    ///   an `access_token`.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthHeaders> {
        let Some(oauth2) = &self.config.oauth2 else {
            tracing::debug!("no oauth2 configuration, using basic headers");
            return Ok(AuthHeaders::Basic {
                username: username.to_string(),
                password: password.to_string(),
            });
        };

        let candidate = match oauth2.access_token() {
            Some(token) => token.to_string(),
            None => {
                let store = TokenStore::new(oauth2.token_file_path());
                if let Some(token) = store.load().await {
                    tracing::debug!("using cached access token");
                    return Ok(AuthHeaders::Bearer(token));
                }
                self.mint(username, password, oauth2, &store).await?
            }
        };

        if !TokenValidator::new(self.config)
            .is_valid(Some(&candidate))
            .await
        {
            return Err(RipsError::AuthFailed(
                "Cannot find/create valid token".to_string(),
            ));
        }

        Ok(AuthHeaders::Bearer(candidate))
    }

    /// Request a token and persist it when configured to.
    async fn mint(
        &self,
        username: &str,
        password: &str,
        oauth2: &OAuth2Config,
        store: &TokenStore,
    ) -> Result<String> {
        let client_id = oauth2.client_id().ok_or_else(|| {
            RipsError::ConfigMissing("Cannot create new oauth token without client id".to_string())
        })?;

        let payload = request_token(self.config, client_id, username, password).await?;

        if oauth2.store_token {
            store.store(&payload).await?;
        }

        Ok(payload.access_token)
    }
}

/// Exchange username and password for a token with the password grant.
///
/// Uses a throwaway transport built from `config` without auth headers.
#[tracing::instrument(skip(config, password))]
pub async fn request_token(
    config: &ClientConfig,
    client_id: &str,
    username: &str,
    password: &str,
) -> Result<TokenPayload> {
    let transport = Transport::new(config, HeaderMap::new())?;
    let grant = serde_json::to_value(PasswordGrant::new(client_id, username, password))?;

    let response = transport
        .send(
            Method::POST,
            OAUTH2_TOKEN_PATH,
            &Value::Null,
            Some(&RequestBody::Json(grant)),
        )
        .await?;
    let payload: TokenPayload = decode_as(decode(response).await?)?;
    tracing::debug!(expires_in = ?payload.expires_in(), "minted access token");
    Ok(payload)
}
