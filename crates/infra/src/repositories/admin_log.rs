use std::sync::{Arc, Mutex};

use nearbykaam_profiles::AdminLogEntry;

use super::{RepositoryError, RepositoryResult, load, save};
use crate::store::{KeyValueStore, keys};

/// Entries kept before the oldest are dropped.
pub const MAX_LOG_ENTRIES: usize = 1_000;

/// Admin audit trail, newest first.
pub struct AdminLogRepository {
    store: Arc<dyn KeyValueStore>,
    write: Mutex<()>,
}

impl AdminLogRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    pub fn append(&self, entry: AdminLogEntry) -> RepositoryResult<()> {
        let _guard = self.write.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut entries = self.list()?;
        entries.insert(0, entry);
        entries.truncate(MAX_LOG_ENTRIES);
        save(self.store.as_ref(), keys::ADMIN_LOGS, &entries)
    }

    pub fn list(&self) -> RepositoryResult<Vec<AdminLogEntry>> {
        Ok(load(self.store.as_ref(), keys::ADMIN_LOGS)?.unwrap_or_default())
    }
}
