//! Service wiring: store backend, repositories, feed and assistant.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use nearbykaam_assistant::{
    AssistantError, FallbackAssistant, GeminiAssistant, GeminiConfig, LanguageAssistant, LocalAssistant,
};
use nearbykaam_auth::{Permission, Role};
use nearbykaam_infra::{
    AdminLogRepository, AppConfig, InMemoryStore, JobRepository, JsonFileStore, KeyValueStore,
    PreferenceRepository, ProfileRepository, RepositoryError, RepositoryResult, StoreError,
};
use nearbykaam_jobs::{DEFAULT_MAX_DISTANCE_KM, FeedConfig, JobFeed};
use nearbykaam_profiles::{AdminLogEntry, EntityType, User};

use crate::context::PrincipalContext;

/// Phone of the admin seeded into an empty roster.
pub const DEFAULT_ADMIN_PHONE: &str = "9999999999";

#[derive(Debug, Error)]
pub enum ServiceInitError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Assistant(#[from] AssistantError),

    #[error("failed to seed admin roster: {0}")]
    Seed(#[from] RepositoryError),
}

/// Failure of repository work run off the async workers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

pub struct AppServices {
    pub jobs: JobRepository,
    pub profiles: ProfileRepository,
    pub admin_log: AdminLogRepository,
    pub preferences: PreferenceRepository,
    pub feed: JobFeed,
    pub max_distance_km: f64,
    pub assistant: Arc<dyn LanguageAssistant>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        feed: JobFeed,
        max_distance_km: f64,
        assistant: Arc<dyn LanguageAssistant>,
    ) -> Self {
        Self {
            jobs: JobRepository::new(store.clone()),
            profiles: ProfileRepository::new(store.clone()),
            admin_log: AdminLogRepository::new(store.clone()),
            preferences: PreferenceRepository::new(store),
            feed,
            max_distance_km,
            assistant,
        }
    }

    /// Default in-memory wiring (dev/test) with the offline assistant.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            JobFeed::default(),
            DEFAULT_MAX_DISTANCE_KM,
            Arc::new(LocalAssistant),
        )
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        let store: Arc<dyn KeyValueStore> = match &config.data_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "using JSON file store");
                Arc::new(JsonFileStore::open(dir)?)
            }
            None => {
                warn!("NEARBYKAAM_DATA_DIR not set; data is kept in memory only");
                Arc::new(InMemoryStore::new())
            }
        };

        let assistant: Arc<dyn LanguageAssistant> = match &config.gemini_api_key {
            Some(key) => {
                let mut gemini = GeminiConfig::new(key.clone());
                if let Some(url) = &config.gemini_api_url {
                    gemini = gemini.with_base_url(url.clone());
                }
                Arc::new(FallbackAssistant::with_local(GeminiAssistant::new(gemini)?))
            }
            None => {
                info!("GEMINI_API_KEY not set; assistant runs offline");
                Arc::new(LocalAssistant)
            }
        };

        let feed = JobFeed::new(FeedConfig {
            tie_window_km: config.tie_window_km,
            ..FeedConfig::default()
        });

        let services = Self::new(store, feed, config.max_distance_km, assistant);
        services.seed_admin_roster()?;
        Ok(services)
    }

    /// Run repository work on the blocking pool.
    ///
    /// Stores do synchronous file IO behind std locks; handlers go through
    /// here instead of calling repositories on a runtime worker.
    pub async fn blocking<T, F>(self: &Arc<Self>, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&AppServices) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let services = Arc::clone(self);
        Ok(tokio::task::spawn_blocking(move || f(&services)).await??)
    }

    /// Put a full-access admin into an empty roster.
    pub fn seed_admin_roster(&self) -> RepositoryResult<()> {
        if !self.profiles.managed_admins()?.is_empty() {
            return Ok(());
        }
        let mut admin = User::new(DEFAULT_ADMIN_PHONE, Role::Admin);
        admin.name = Some("Super Admin".to_string());
        admin.profile_completed = true;
        admin.permissions = vec![Permission::FullAccess];
        self.profiles.upsert_managed_admin(admin)
    }

    /// Record an admin action in the audit trail. Failures are logged, not returned.
    pub fn audit(
        &self,
        principal: &PrincipalContext,
        action: &str,
        entity_type: EntityType,
        entity_id: &str,
        details: impl Into<String>,
    ) {
        let admin_name = self
            .profiles
            .admin_name(principal.phone())
            .unwrap_or_else(|_| principal.phone().to_string());

        let mut entry = AdminLogEntry::new(principal.phone(), action, entity_type, entity_id, Utc::now())
            .with_details(details);
        entry.admin_name = admin_name;

        if let Err(e) = self.admin_log.append(entry) {
            warn!(error = %e, action, entity_id, "failed to write audit entry");
        }
    }

    /// Periodically expire postings past their expiry window.
    pub fn spawn_expiry_sweeper(self: &Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let services = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let services = Arc::clone(&services);
                let swept = tokio::task::spawn_blocking(move || services.jobs.expire_due(Utc::now())).await;
                match swept {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!(error = %e, "expiry sweep failed"),
                    Err(e) => warn!(error = %e, "expiry sweep panicked"),
                }
            }
        })
    }
}
