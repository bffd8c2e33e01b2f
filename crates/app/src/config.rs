//! Process configuration read from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use portal_store::{DEFAULT_PREFIX, FileStorage, InMemoryStorage, Keys, PortalStore, Storage};

pub const STORAGE_PATH_VAR: &str = "PORTAL_STORAGE_PATH";
pub const KEY_PREFIX_VAR: &str = "PORTAL_KEY_PREFIX";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// JSON document backing the store. `None` keeps everything in memory.
    pub storage_path: Option<PathBuf>,
    pub key_prefix: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            key_prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let key_prefix = get(KEY_PREFIX_VAR).unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if key_prefix.chars().any(char::is_whitespace) {
            anyhow::bail!("{KEY_PREFIX_VAR} must not contain whitespace (got {key_prefix:?})");
        }

        Ok(Self {
            storage_path: get(STORAGE_PATH_VAR).map(PathBuf::from),
            key_prefix,
        })
    }

    pub fn open_storage(&self) -> anyhow::Result<Arc<dyn Storage>> {
        match &self.storage_path {
            Some(path) => {
                let storage = FileStorage::open(path)
                    .with_context(|| format!("failed to open storage at {}", path.display()))?;
                Ok(Arc::new(storage))
            }
            None => {
                tracing::warn!("{STORAGE_PATH_VAR} not set; using in-memory storage");
                Ok(Arc::new(InMemoryStorage::new()))
            }
        }
    }

    pub fn open_store(&self) -> anyhow::Result<PortalStore> {
        let storage = self.open_storage()?;
        Ok(PortalStore::new(storage, Keys::new(self.key_prefix.clone())))
    }
}
