use std::sync::Arc;

use portal_auth::SessionStore;
use portal_core::RepositoryResult;

use crate::{Keys, Storage};

/// Session record kept under `<prefix>current-user`.
pub struct StorageSessionStore {
    storage: Arc<dyn Storage>,
    key: String,
}

impl StorageSessionStore {
    pub fn new(storage: Arc<dyn Storage>, keys: &Keys) -> Self {
        Self {
            storage,
            key: keys.session(),
        }
    }
}

impl SessionStore for StorageSessionStore {
    fn load(&self) -> RepositoryResult<Option<String>> {
        Ok(self.storage.get_item(&self.key)?)
    }

    fn save(&self, raw: &str) -> RepositoryResult<()> {
        Ok(self.storage.set_item(&self.key, raw)?)
    }

    fn clear(&self) -> RepositoryResult<()> {
        Ok(self.storage.remove_item(&self.key)?)
    }
}
