//! The closed job category enumeration and its legacy key mapping.
//!
//! Older clients (and older exports of the browser store) used a wider,
//! inconsistent set of category keys. Every key ever written maps onto exactly
//! one [`JobCategory`] through [`LEGACY_CATEGORY_KEYS`]; bump
//! [`CATEGORY_MAP_VERSION`] whenever that table changes.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Version of the category enumeration + legacy mapping table.
pub const CATEGORY_MAP_VERSION: u32 = 2;

/// Job category.
///
/// `Other` doubles as the "no specific category" sentinel in feed filters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobCategory {
    Hotel,
    Shop,
    Garage,
    Delivery,
    Construction,
    HouseHelp,
    Security,
    Other,
}

/// Legacy string keys and the category each one now means.
pub const LEGACY_CATEGORY_KEYS: &[(&str, JobCategory)] = &[
    ("HOSPITALITY", JobCategory::Hotel),
    ("RETAIL", JobCategory::Shop),
    ("AUTOMOBILE", JobCategory::Garage),
    ("DELIVERY_LOGISTICS", JobCategory::Delivery),
    ("DRIVER", JobCategory::Delivery),
    ("GIG_ON_DEMAND", JobCategory::Delivery),
    ("HOUSEHOLD", JobCategory::HouseHelp),
    ("FACTORY_MANUFACTURING", JobCategory::Other),
    ("OFFICE_SERVICES", JobCategory::Other),
    ("HEALTHCARE_SUPPORT", JobCategory::Other),
    ("AGRICULTURE", JobCategory::Other),
];

/// A key that is neither canonical nor in the legacy table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown job category '{0}'")]
pub struct UnknownCategory(pub String);

impl JobCategory {
    pub const ALL: [JobCategory; 8] = [
        JobCategory::Hotel,
        JobCategory::Shop,
        JobCategory::Garage,
        JobCategory::Delivery,
        JobCategory::Construction,
        JobCategory::HouseHelp,
        JobCategory::Security,
        JobCategory::Other,
    ];

    /// Canonical wire key.
    pub fn key(&self) -> &'static str {
        match self {
            JobCategory::Hotel => "HOTEL",
            JobCategory::Shop => "SHOP",
            JobCategory::Garage => "GARAGE",
            JobCategory::Delivery => "DELIVERY",
            JobCategory::Construction => "CONSTRUCTION",
            JobCategory::HouseHelp => "HOUSE_HELP",
            JobCategory::Security => "SECURITY",
            JobCategory::Other => "OTHER",
        }
    }

    /// English display label.
    pub fn label(&self) -> &'static str {
        match self {
            JobCategory::Hotel => "Hotel / Restaurant",
            JobCategory::Shop => "Shop / Retail",
            JobCategory::Garage => "Garage / Mechanic",
            JobCategory::Delivery => "Delivery / Driver",
            JobCategory::Construction => "Construction",
            JobCategory::HouseHelp => "House Help",
            JobCategory::Security => "Security Guard",
            JobCategory::Other => "Other",
        }
    }

    /// Resolve a canonical or legacy key, case-insensitively.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        if let Some(c) = Self::ALL.iter().find(|c| c.key() == normalized) {
            return Some(*c);
        }
        LEGACY_CATEGORY_KEYS
            .iter()
            .find(|(legacy, _)| *legacy == normalized)
            .map(|(_, c)| *c)
    }

    pub fn is_sentinel(&self) -> bool {
        *self == JobCategory::Other
    }
}

impl core::fmt::Display for JobCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

impl core::str::FromStr for JobCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Stored records never fail to load because of a category key: unknown keys
/// become `OTHER`.
impl<'de> Deserialize<'de> for JobCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(JobCategory::from_key(&raw).unwrap_or(JobCategory::Other))
    }
}
