use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearbykaam_core::{DomainError, DomainResult, Location, normalize_mobile};
use nearbykaam_jobs::JobCategory;

use crate::employer::WageType;
use crate::require_name;

/// Voice or document resume attached to a worker profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerResume {
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub has_document: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub job_type: JobCategory,
    #[serde(default)]
    pub preferred_job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_salary: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_salary_type: Option<WageType>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub resume: WorkerResume,
    pub created_at: DateTime<Utc>,
}

impl WorkerProfile {
    /// Check required fields and normalize the phone number in place.
    pub fn validate(&mut self) -> DomainResult<()> {
        require_name("name", &self.name)?;
        self.phone = normalize_mobile(&self.phone)?;
        if let Some(email) = self.email.as_deref() {
            if !email.trim().is_empty() && !email.contains('@') {
                return Err(DomainError::validation("email is malformed"));
            }
        }
        if let Some(loc) = &self.location {
            loc.point().validate()?;
        }
        // Resume flags follow the attachments actually present.
        self.resume.has_audio = self.resume.audio_url.is_some();
        self.resume.has_document = self.resume.document_url.is_some();
        Ok(())
    }
}
