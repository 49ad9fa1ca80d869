use serde::{Deserialize, Serialize};

use nearbykaam_core::{GeoPoint, Location};
use nearbykaam_jobs::{
    ContactChannel, ExperienceBucket, FeedCriteria, FeedJob, JobCategory, SalaryType, ShopPhoto,
};

// -------------------------
// Request DTOs
// -------------------------

/// `GET /feed` query string.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub max_distance_km: Option<f64>,
    pub category: Option<String>,
    pub experience: Option<String>,
    pub q: Option<String>,
}

impl FeedQuery {
    /// Validate and convert into feed criteria.
    pub fn to_criteria(&self, default_max_distance_km: f64) -> Result<FeedCriteria, String> {
        let mut criteria = FeedCriteria::default().within_km(default_max_distance_km);

        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let point = GeoPoint::new(lat, lng);
                point.validate().map_err(|e| e.to_string())?;
                criteria = criteria.near(point);
            }
            (None, None) => {}
            _ => return Err("lat and lng must be given together".into()),
        }

        if let Some(km) = self.max_distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(format!("max_distance_km must be zero or a positive number, got {km}"));
            }
            criteria = criteria.within_km(km);
        }

        if let Some(raw) = non_blank(&self.category) {
            let category =
                JobCategory::from_key(raw).ok_or_else(|| format!("unknown category '{raw}'"))?;
            criteria = criteria.in_category(category);
        }

        if let Some(raw) = non_blank(&self.experience) {
            let bucket: ExperienceBucket = raw.parse().map_err(|e| format!("{e}"))?;
            criteria = criteria.with_experience(bucket);
        }

        if let Some(q) = non_blank(&self.q) {
            criteria = criteria.matching(q);
        }

        Ok(criteria)
    }
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `POST /jobs` body (employer posting form).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostJobRequest {
    #[serde(default)]
    pub title: String,
    pub job_role: Option<String>,
    pub category: JobCategory,
    pub industry: Option<String>,
    pub description: Option<String>,
    /// Defaults to the stored employer profile.
    pub employer_name: Option<String>,
    /// Defaults to the caller's phone.
    pub call_number: Option<String>,
    pub whatsapp_number: Option<String>,
    /// "Same as WhatsApp": use the call number for both buttons.
    #[serde(default)]
    pub same_as_call: bool,
    pub shop_photo: Option<ShopPhoto>,
    pub location: Location,
    pub salary_amount: String,
    pub salary_type: SalaryType,
    pub expiry_days: Option<u32>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub channel: ContactChannel,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModerationNoteRequest {
    pub note: Option<String>,
}

fn default_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
pub struct AssistantSearchRequest {
    pub query: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub max_distance_km: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default = "default_lang")]
    pub lang: String,
}

/// Partial update of device preferences.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub language: Option<String>,
    pub muted: Option<bool>,
    pub last_location: Option<Location>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub count: usize,
    pub jobs: Vec<FeedJob>,
}

impl From<Vec<FeedJob>> for FeedResponse {
    fn from(jobs: Vec<FeedJob>) -> Self {
        Self {
            count: jobs.len(),
            jobs,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub language: Option<String>,
    pub muted: bool,
    pub last_location: Option<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_is_default_criteria() {
        let c = FeedQuery::default().to_criteria(30.0).unwrap();
        assert_eq!(c, FeedCriteria::default());
    }

    #[test]
    fn full_query_maps_every_field() {
        let q = FeedQuery {
            lat: Some(12.97),
            lng: Some(77.59),
            max_distance_km: Some(5.0),
            category: Some("hospitality".into()),
            experience: Some("entry level".into()),
            q: Some("  cook ".into()),
        };
        let c = q.to_criteria(30.0).unwrap();
        assert_eq!(c.user_location, Some(GeoPoint::new(12.97, 77.59)));
        assert_eq!(c.max_distance_km, 5.0);
        assert_eq!(c.category, Some(JobCategory::Hotel));
        assert_eq!(c.experience, ExperienceBucket::EntryLevel);
        assert_eq!(c.search_text, "cook");
    }

    #[test]
    fn rejects_half_coordinates_and_bad_values() {
        let half = FeedQuery {
            lat: Some(12.0),
            ..Default::default()
        };
        assert!(half.to_criteria(30.0).is_err());

        let out_of_range = FeedQuery {
            lat: Some(95.0),
            lng: Some(77.0),
            ..Default::default()
        };
        assert!(out_of_range.to_criteria(30.0).is_err());

        let negative = FeedQuery {
            max_distance_km: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.to_criteria(30.0).is_err());

        let unknown = FeedQuery {
            category: Some("astronaut".into()),
            ..Default::default()
        };
        assert!(unknown.to_criteria(30.0).is_err());
    }

    #[test]
    fn zero_max_distance_is_accepted() {
        let q = FeedQuery {
            lat: Some(12.97),
            lng: Some(77.59),
            max_distance_km: Some(0.0),
            ..Default::default()
        };
        let c = q.to_criteria(30.0).unwrap();
        assert_eq!(c.max_distance_km, 0.0);
        assert_eq!(c.user_location, Some(GeoPoint::new(12.97, 77.59)));
    }
}
