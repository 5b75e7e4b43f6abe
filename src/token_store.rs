//! On-disk OAuth2 token cache.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, RipsError};
use crate::models::TokenPayload;

/// Best-effort token cache backed by a single JSON file.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    path: Option<PathBuf>,
}

impl TokenStore {
    /// A store at `path`. An empty path disables reading and makes
    /// [`store`](Self::store) fail.
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf),
        }
    }

    /// The configured cache file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the cached `access_token`.
    ///
    /// A missing path, missing file, unreadable file, invalid JSON or an
    /// absent/empty `access_token` field are all cache misses.
    pub async fn load(&self) -> Option<String> {
        let path = self.path.as_deref()?;

        let data = match tokio::fs::read_to_string(path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "token cache miss");
                return None;
            }
        };

        if data.trim().is_empty() {
            tracing::debug!(path = %path.display(), "token cache file is empty");
            return None;
        }

        let token = serde_json::from_str::<Value>(&data)
            .ok()
            .and_then(|json| json.get("access_token")?.as_str().map(str::to_string))
            .filter(|token| !token.is_empty());

        if token.is_none() {
            tracing::debug!(path = %path.display(), "token cache file holds no access token");
        }

        token
    }

    /// Overwrite the cache with the full token payload.
    ///
    /// # Errors
    ///
    /// Returns [`RipsError::ConfigMissing`] when no path is configured and
    /// [`RipsError::Io`] if the file cannot be written.
    pub async fn store(&self, payload: &TokenPayload) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| RipsError::ConfigMissing("Token path is needed to store token".to_string()))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string(payload)?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // New files are created 0600 on Unix systems
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(path).await?;

        // An existing file keeps its mode on open, so tighten it before writing
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }

        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), "stored access token");
        Ok(())
    }
}
