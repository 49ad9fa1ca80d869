//! Typed repositories over a [`KeyValueStore`](crate::KeyValueStore).

mod admin_log;
mod jobs;
mod preferences;
mod profiles;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use nearbykaam_core::DomainError;

use crate::store::{KeyValueStore, StoreError};

pub use admin_log::AdminLogRepository;
pub use jobs::JobRepository;
pub use preferences::PreferenceRepository;
pub use profiles::ProfileRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("repository lock poisoned")]
    Poisoned,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> RepositoryResult<Option<T>> {
    let Some(value) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
        .map_err(Into::into)
}

fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> RepositoryResult<()> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.put(key, value)?;
    Ok(())
}
