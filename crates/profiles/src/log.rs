//! Admin audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearbykaam_core::LogEntryId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Job,
    Employer,
    Worker,
    Admin,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogEntry {
    pub id: LogEntryId,
    pub admin_id: String,
    pub admin_name: String,
    pub action: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: String,
}

impl AdminLogEntry {
    pub fn new(
        admin_id: impl Into<String>,
        action: impl Into<String>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let admin_id = admin_id.into();
        Self {
            id: LogEntryId::new(),
            admin_name: admin_id.clone(),
            admin_id,
            action: action.into(),
            entity_type,
            entity_id: entity_id.into(),
            timestamp,
            details: String::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}
