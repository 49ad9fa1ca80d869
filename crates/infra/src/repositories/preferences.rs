use std::sync::Arc;

use nearbykaam_core::Location;

use super::{RepositoryResult, load, save};
use crate::store::{KeyValueStore, keys};

/// Per-device settings: UI language, mute switch, last known location.
pub struct PreferenceRepository {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn language(&self, scope: &str) -> RepositoryResult<Option<String>> {
        load(self.store.as_ref(), &keys::scoped(keys::LANGUAGE, scope))
    }

    pub fn set_language(&self, scope: &str, lang: &str) -> RepositoryResult<()> {
        save(self.store.as_ref(), &keys::scoped(keys::LANGUAGE, scope), &lang)
    }

    pub fn is_muted(&self, scope: &str) -> RepositoryResult<bool> {
        Ok(load(self.store.as_ref(), &keys::scoped(keys::MUTE, scope))?.unwrap_or(false))
    }

    pub fn set_muted(&self, scope: &str, muted: bool) -> RepositoryResult<()> {
        save(self.store.as_ref(), &keys::scoped(keys::MUTE, scope), &muted)
    }

    pub fn last_location(&self, scope: &str) -> RepositoryResult<Option<Location>> {
        load(self.store.as_ref(), &keys::scoped(keys::LAST_LOCATION, scope))
    }

    pub fn set_last_location(&self, scope: &str, location: &Location) -> RepositoryResult<()> {
        save(self.store.as_ref(), &keys::scoped(keys::LAST_LOCATION, scope), location)
    }
}
