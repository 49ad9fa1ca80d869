//! The job posting record as stored and served.
//!
//! The JSON shape is camelCase and matches what the mobile client has always
//! persisted, so existing exports load without migration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use nearbykaam_core::{Entity, GeoPoint, JobId, Location};

use crate::category::JobCategory;

/// Default number of days a posting stays up after creation.
pub const DEFAULT_EXPIRY_DAYS: u32 = 15;

/// Moderation / publishing status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Active,
    Expired,
    PendingApproval,
    Rejected,
    Approved,
    Paused,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "ACTIVE",
            JobStatus::Expired => "EXPIRED",
            JobStatus::PendingApproval => "PENDING_APPROVAL",
            JobStatus::Rejected => "REJECTED",
            JobStatus::Approved => "APPROVED",
            JobStatus::Paused => "PAUSED",
        }
    }
}

impl core::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(JobStatus::Active),
            "EXPIRED" => Ok(JobStatus::Expired),
            "PENDING_APPROVAL" | "PENDING" => Ok(JobStatus::PendingApproval),
            "REJECTED" => Ok(JobStatus::Rejected),
            "APPROVED" => Ok(JobStatus::Approved),
            "PAUSED" => Ok(JobStatus::Paused),
            other => Err(format!("unknown job status '{other}'")),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalaryType {
    Day,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub call_number: String,
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopPhoto {
    pub url: String,
    pub uploaded_at: String,
}

fn default_expiry_days() -> u32 {
    DEFAULT_EXPIRY_DAYS
}

/// A single job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_role: Option<String>,
    pub category: JobCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub employer_id: String,
    pub employer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employer_first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub shop_photo: Option<ShopPhoto>,

    pub location: Location,

    pub salary_amount: String,
    pub salary_type: SalaryType,

    pub status: JobStatus,
    pub is_live: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_promoted: bool,
    #[serde(default)]
    pub is_reported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,

    #[serde(default)]
    pub call_count: u64,
    #[serde(default)]
    pub whatsapp_count: u64,

    pub created_at: DateTime<Utc>,
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<String>,
}

impl Entity for JobRecord {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl JobRecord {
    /// Approved by moderation and switched live.
    ///
    /// `status` is the moderation outcome and `is_live` the publish gate; a job
    /// needs both to be shown.
    pub fn is_displayable(&self) -> bool {
        self.status == JobStatus::Approved && self.is_live
    }

    pub fn point(&self) -> GeoPoint {
        self.location.point()
    }

    /// Role if set, otherwise the title.
    pub fn display_role(&self) -> &str {
        self.job_role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(&self.title)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(i64::from(self.expiry_days))
    }

    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// Whole days left before expiry (0 once expired).
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at() - now).num_days().max(0)
    }

    /// Free-text haystack used by the feed search.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description.as_deref().unwrap_or_default(),
            self.employer_name,
            self.job_role.as_deref().unwrap_or_default(),
        )
        .to_lowercase()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    /// An approved, live, unverified job at `point`.
    pub fn job(id: &str, point: GeoPoint) -> JobRecord {
        JobRecord {
            id: JobId::from(id),
            title: format!("Job {id}"),
            job_role: None,
            category: JobCategory::Hotel,
            industry: None,
            description: None,
            employer_id: "emp-1".into(),
            employer_name: "Sharma Dhaba".into(),
            employer_first_name: None,
            shop_name: None,
            contact: ContactInfo {
                call_number: "9876543210".into(),
                whatsapp_number: "9876543210".into(),
            },
            shop_photo: None,
            location: Location::at(point),
            salary_amount: "600".into(),
            salary_type: SalaryType::Day,
            status: JobStatus::Approved,
            is_live: true,
            is_verified: false,
            is_promoted: false,
            is_reported: false,
            approved_at: None,
            approved_by: None,
            admin_note: None,
            call_count: 0,
            whatsapp_count: 0,
            created_at: t0(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
            experience_level: None,
            employment_type: None,
            work_mode: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn displayable_requires_both_approved_and_live() {
        let mut j = job("a", GeoPoint::new(12.9, 77.6));
        assert!(j.is_displayable());

        j.is_live = false;
        assert!(!j.is_displayable());

        j.is_live = true;
        j.status = JobStatus::Paused;
        assert!(!j.is_displayable());
    }

    #[test]
    fn loads_legacy_browser_json() {
        let raw = r#"{
            "id": "k3j9x0a2b",
            "title": "Cook",
            "category": "HOSPITALITY",
            "employerId": "me",
            "employerName": "Annapurna Hotel",
            "contact": { "callNumber": "9000000001", "whatsappNumber": "9000000001" },
            "shopPhoto": null,
            "location": { "lat": 12.97, "lng": 77.59, "address": "Indiranagar" },
            "salaryAmount": "15000",
            "salaryType": "MONTH",
            "isVerified": false,
            "isPromoted": false,
            "status": "PENDING_APPROVAL",
            "isLive": false,
            "callCount": 3,
            "whatsappCount": 1,
            "createdAt": "2025-11-02T10:15:30.000Z"
        }"#;

        let j: JobRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(j.category, JobCategory::Hotel);
        assert_eq!(j.status, JobStatus::PendingApproval);
        assert_eq!(j.expiry_days, DEFAULT_EXPIRY_DAYS);
        assert!(!j.is_reported);
        assert_eq!(j.call_count, 3);
    }

    #[test]
    fn serializes_camel_case() {
        let j = job("a", GeoPoint::new(12.9, 77.6));
        let v = serde_json::to_value(&j).unwrap();
        assert_eq!(v["isLive"], true);
        assert_eq!(v["salaryType"], "DAY");
        assert_eq!(v["status"], "APPROVED");
        assert!(v.get("jobRole").is_none());
    }

    #[test]
    fn expiry_is_created_plus_days() {
        let j = job("a", GeoPoint::new(12.9, 77.6));
        assert!(!j.is_past_expiry(t0() + Duration::days(14)));
        assert!(j.is_past_expiry(t0() + Duration::days(15)));
        assert_eq!(j.days_remaining(t0() + Duration::days(10)), 5);
        assert_eq!(j.days_remaining(t0() + Duration::days(40)), 0);
    }

    #[test]
    fn search_text_skips_missing_fields() {
        let mut j = job("a", GeoPoint::new(12.9, 77.6));
        j.title = "Delivery Driver Needed".into();
        assert_eq!(j.search_text(), "delivery driver needed  sharma dhaba ");
    }

    #[test]
    fn display_role_prefers_role() {
        let mut j = job("a", GeoPoint::new(12.9, 77.6));
        assert_eq!(j.display_role(), "Job a");
        j.job_role = Some("Tandoor Cook".into());
        assert_eq!(j.display_role(), "Tandoor Cook");
    }
}
