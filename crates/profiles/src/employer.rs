use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearbykaam_core::{DomainResult, Location, normalize_mobile};
use nearbykaam_jobs::ShopPhoto;

use crate::require_name;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WageType {
    Daily,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfile {
    pub first_name: String,
    pub phone: String,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub shop_photo: Option<ShopPhoto>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_wage_type: Option<WageType>,
}

impl EmployerProfile {
    /// Blank draft for a freshly signed-in employer.
    pub fn empty(phone: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            first_name: String::new(),
            phone: phone.into(),
            shop_name: String::new(),
            industry: None,
            location: None,
            shop_photo: None,
            created_at: now,
            is_verified: false,
            expected_wage_type: None,
        }
    }

    pub fn validate(&mut self) -> DomainResult<()> {
        require_name("first name", &self.first_name)?;
        self.phone = normalize_mobile(&self.phone)?;
        if let Some(loc) = &self.location {
            loc.point().validate()?;
        }
        Ok(())
    }

    /// Name shown on postings: the shop if set, otherwise the owner.
    pub fn display_name(&self) -> &str {
        let shop = self.shop_name.trim();
        if shop.is_empty() { self.first_name.trim() } else { shop }
    }
}
