//! RIPS API client.
//!
//! [`RipsClient`] runs the session bootstrap once and then hands out one
//! [`ResourceClient`] per REST resource, all sharing a single transport
//! with the authentication headers baked in.

use std::env;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Result, RipsError};
use crate::models::Status;
use crate::resource::{decode, decode_as, ResourceClient};
use crate::resources;
use crate::session::{AuthHeaders, SessionManager};
use crate::transport::{Transport, VERSION};

/// High-level RIPS API client.
///
/// Every resource is exposed as a public [`ResourceClient`] field, built
/// eagerly at construction. Parent ids are passed in path order, e.g.
/// `client.comments.get_all(&[app, scan, issue], &Value::Null)`.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use ripsapi::{ClientConfig, RipsClient};
/// use serde_json::{json, Value};
///
/// # async fn example() -> ripsapi::Result<()> {
/// let config = ClientConfig::new("https://api.rips.example");
/// let client = RipsClient::connect("alice", "secret", config).await?;
///
/// let apps = client.applications.get_all(&[], &Value::Null).await?;
/// let issues = client
///     .issues
///     .get_all(&[1, 7], &json!({"equal": {"type": 12}}))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RipsClient {
    transport: Transport,
    auth: AuthHeaders,

    pub applications: ResourceClient,
    pub scans: ResourceClient,
    pub issues: ResourceClient,
    pub comments: ResourceClient,
    pub scan_sources: ResourceClient,
    pub exports: ResourceClient,
    pub customs: ResourceClient,
    pub ignores: ResourceClient,
    pub sanitisers: ResourceClient,
    pub sinks: ResourceClient,
    pub sources: ResourceClient,
    pub validators: ResourceClient,
    pub logs: ResourceClient,
    pub users: ResourceClient,
    pub teams: ResourceClient,
    pub orgs: ResourceClient,
    pub licenses: ResourceClient,
    pub quotas: ResourceClient,
    pub settings: ResourceClient,
    pub oauth2_clients: ResourceClient,
    pub status: ResourceClient,
}

impl std::fmt::Debug for RipsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RipsClient")
            .field("base_url", &self.transport.base_url().as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl RipsClient {
    /// Authenticate and build a client.
    ///
    /// See [`SessionManager::authenticate`] for how the credentials are
    /// turned into headers.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the base URI is invalid.
    pub async fn connect(username: &str, password: &str, config: ClientConfig) -> Result<Self> {
        let auth = SessionManager::new(&config)
            .authenticate(username, password)
            .await?;
        Self::with_auth(&config, auth)
    }

    /// Create a client from environment variables.
    ///
    /// Uses `RIPS_USERNAME` and `RIPS_PASSWORD` plus everything
    /// [`ClientConfig::from_env`] reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are not set or authentication fails.
    pub async fn from_env() -> Result<Self> {
        let username = env::var("RIPS_USERNAME").map_err(|_| {
            RipsError::ConfigMissing("RIPS_USERNAME environment variable not set".to_string())
        })?;
        let password = env::var("RIPS_PASSWORD").map_err(|_| {
            RipsError::ConfigMissing("RIPS_PASSWORD environment variable not set".to_string())
        })?;

        Self::connect(&username, &password, ClientConfig::from_env()?).await
    }

    /// Build a client around already-resolved authentication headers.
    pub fn with_auth(config: &ClientConfig, auth: AuthHeaders) -> Result<Self> {
        let transport = Transport::new(config, auth.to_header_map()?)?;
        let resource = |spec| ResourceClient::new(transport.clone(), spec);

        Ok(Self {
            applications: resource(resources::APPLICATIONS),
            scans: resource(resources::SCANS),
            issues: resource(resources::ISSUES),
            comments: resource(resources::COMMENTS),
            scan_sources: resource(resources::SCAN_SOURCES),
            exports: resource(resources::SCAN_EXPORTS),
            customs: resource(resources::CUSTOMS),
            ignores: resource(resources::CUSTOM_IGNORES),
            sanitisers: resource(resources::CUSTOM_SANITISERS),
            sinks: resource(resources::CUSTOM_SINKS),
            sources: resource(resources::CUSTOM_SOURCES),
            validators: resource(resources::CUSTOM_VALIDATORS),
            logs: resource(resources::LOGS),
            users: resource(resources::USERS),
            teams: resource(resources::TEAMS),
            orgs: resource(resources::ORGS),
            licenses: resource(resources::LICENSES),
            quotas: resource(resources::QUOTAS),
            settings: resource(resources::SETTINGS),
            oauth2_clients: resource(resources::OAUTH2_CLIENTS),
            status: resource(resources::STATUS),
            transport,
            auth,
        })
    }

    /// Connector version.
    pub fn version(&self) -> &'static str {
        VERSION
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// Authentication headers chosen at construction.
    pub fn auth_headers(&self) -> &AuthHeaders {
        &self.auth
    }

    /// The shared transport, for requests outside the resource table.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// A client for any resource description sharing this client's transport.
    pub fn resource(&self, spec: crate::resource::ResourceSpec) -> ResourceClient {
        ResourceClient::new(self.transport.clone(), spec)
    }

    /// Fetch the status document.
    pub async fn get_status(&self) -> Result<Status> {
        decode_as(self.status.get_all(&[], &Value::Null).await?)
    }

    /// Whether the server recognizes this client's credentials.
    pub async fn is_logged_in(&self) -> Result<bool> {
        let response = self
            .transport
            .send(Method::GET, resources::STATUS.path, &Value::Null, None)
            .await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        Ok(decode_as::<Status>(decode(response).await?)?.is_logged_in())
    }
}
