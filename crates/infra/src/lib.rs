//! `nearbykaam-infra`
//!
//! Storage and configuration around the pure domain crates:
//! - `store`: the key/value interface with in-memory and JSON-file backends
//! - `repositories`: typed access to jobs, profiles, the admin log and preferences
//! - `config`: process configuration from the environment

pub mod config;
pub mod repositories;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use repositories::{
    AdminLogRepository, JobRepository, PreferenceRepository, ProfileRepository, RepositoryError,
    RepositoryResult,
};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, StoreError, keys};
