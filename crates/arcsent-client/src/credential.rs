//! Credential providers.
//!
//! The daemon authenticates every request with a single opaque token sent
//! verbatim in the `Authorization` header. The token is read before each
//! request, so a `set` or `clear` takes effect on the next call without
//! rebuilding the client.
//!
//! Security notes:
//! - Tokens are held in `Zeroizing` buffers and wiped when replaced or cleared.
//! - Never log token material.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{ApiError, ApiResult};

/// Storage key under which the token is persisted.
pub const CREDENTIAL_KEY: &str = "arcsent_token";

/// Source of the daemon credential.
pub trait CredentialProvider: Send + Sync {
    /// Current token, `None` when unset.
    fn get(&self) -> ApiResult<Option<String>>;

    /// Replace the stored token.
    fn set(&self, token: &str) -> ApiResult<()>;

    /// Remove the stored token.
    fn clear(&self) -> ApiResult<()>;
}

/// Arc wrapper for CredentialProvider trait objects.
pub type DynCredentialProvider = Arc<dyn CredentialProvider>;

/// Process-local credential store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<Zeroizing<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(Zeroizing::new(token.into()))),
        }
    }
}

impl CredentialProvider for MemoryCredentialStore {
    fn get(&self) -> ApiResult<Option<String>> {
        Ok(self.token.read().as_ref().map(|t| t.to_string()))
    }

    fn set(&self, token: &str) -> ApiResult<()> {
        *self.token.write() = Some(Zeroizing::new(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        self.token.write().take();
        Ok(())
    }
}

/// Credential store persisted as a JSON key-value file.
///
/// The token lives under [`CREDENTIAL_KEY`]; other keys in the file are
/// preserved. On Unix the file is written with 0600 permissions.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ApiResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = Zeroizing::new(std::fs::read_to_string(&self.path).map_err(|e| {
            ApiError::Credential(format!("Failed to read {}: {e}", self.path.display()))
        })?);
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ApiError::Credential(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if entries.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).map_err(|e| {
                    ApiError::Credential(format!("Failed to remove {}: {e}", self.path.display()))
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Credential(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let content = Zeroizing::new(
            serde_json::to_string_pretty(entries)
                .map_err(|e| ApiError::Credential(format!("Failed to encode credentials: {e}")))?,
        );
        std::fs::write(&self.path, content.as_bytes()).map_err(|e| {
            ApiError::Credential(format!("Failed to write {}: {e}", self.path.display()))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).map_err(
                |e| ApiError::Credential(format!("Failed to restrict {}: {e}", self.path.display())),
            )?;
        }

        Ok(())
    }
}

impl CredentialProvider for FileCredentialStore {
    fn get(&self) -> ApiResult<Option<String>> {
        Ok(self.load()?.remove(CREDENTIAL_KEY))
    }

    fn set(&self, token: &str) -> ApiResult<()> {
        let mut entries = self.load()?;
        entries.insert(CREDENTIAL_KEY.to_string(), token.to_string());
        self.store(&entries)?;
        debug!(path = %self.path.display(), "Credential stored");
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        let mut entries = self.load()?;
        if entries.remove(CREDENTIAL_KEY).is_some() {
            self.store(&entries)?;
            debug!(path = %self.path.display(), "Credential cleared");
        }
        Ok(())
    }
}
