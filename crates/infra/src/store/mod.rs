//! Key/value persistence.
//!
//! Values are JSON documents addressed by string keys. Keys mirror the
//! identifiers the mobile client has always used, so a browser export can be
//! dropped into a data directory as-is.

mod in_memory;
mod json_file;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

/// Well-known keys.
pub mod keys {
    pub const JOBS: &str = "nearbykaam_jobs_v3";
    pub const USER: &str = "nearbykaam_user";
    pub const WORKER_PROFILE: &str = "nearbykaam_worker_profile";
    pub const EMPLOYER_PROFILE: &str = "nearbykaam_employer_profile";
    pub const LANGUAGE: &str = "nearbykaam_lang";
    pub const MUTE: &str = "nearbykaam_mute";
    pub const LAST_LOCATION: &str = "nearbykaam_loc";
    pub const ADMIN_LOGS: &str = "nearbykaam_admin_logs";
    pub const MANAGED_ADMINS: &str = "nearbykaam_managed_admins";

    /// Per-account key: `{prefix}_{phone}`.
    pub fn scoped(prefix: &str, phone: &str) -> String {
        format!("{prefix}_{phone}")
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("value under '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Minimal document store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;
    /// Returns whether a value was removed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys()
    }
}

pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && key.len() <= 200
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
