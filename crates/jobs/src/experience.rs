//! Experience buckets offered by the feed filter.
//!
//! Postings carry free-text experience levels ("Fresher", "Senior", ...). A
//! bucket matches a posting when the posting's level is one of the bucket's
//! members in the [`ExperienceTable`]. The membership lists are product
//! choices and can be replaced through configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Experience filter choice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ExperienceBucket {
    #[default]
    #[serde(rename = "All")]
    All,
    #[serde(rename = "Entry Level")]
    EntryLevel,
    #[serde(rename = "1-2 Years")]
    OneToTwoYears,
    #[serde(rename = "3+ Years")]
    ThreePlusYears,
}

impl ExperienceBucket {
    /// Choices in display order.
    pub const OPTIONS: [ExperienceBucket; 4] = [
        ExperienceBucket::All,
        ExperienceBucket::EntryLevel,
        ExperienceBucket::OneToTwoYears,
        ExperienceBucket::ThreePlusYears,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBucket::All => "All",
            ExperienceBucket::EntryLevel => "Entry Level",
            ExperienceBucket::OneToTwoYears => "1-2 Years",
            ExperienceBucket::ThreePlusYears => "3+ Years",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown experience bucket '{0}'")]
pub struct UnknownExperienceBucket(pub String);

impl core::str::FromStr for ExperienceBucket {
    type Err = UnknownExperienceBucket;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::OPTIONS
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownExperienceBucket(s.to_string()))
    }
}

impl core::fmt::Display for ExperienceBucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket → accepted experience-level strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceTable {
    members: BTreeMap<ExperienceBucket, Vec<String>>,
}

impl Default for ExperienceTable {
    fn default() -> Self {
        let mut members = BTreeMap::new();
        members.insert(
            ExperienceBucket::EntryLevel,
            vec!["Entry Level".into(), "Fresher".into(), "No Experience".into()],
        );
        members.insert(ExperienceBucket::OneToTwoYears, vec!["1-2 Years".into()]);
        members.insert(
            ExperienceBucket::ThreePlusYears,
            vec!["3+ Years".into(), "Senior".into(), "5+ Years".into()],
        );
        Self { members }
    }
}

impl ExperienceTable {
    /// Replace the member list of one bucket.
    pub fn with_members<I, S>(mut self, bucket: ExperienceBucket, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members
            .insert(bucket, levels.into_iter().map(Into::into).collect());
        self
    }

    /// Does a posting with `level` pass the `bucket` filter?
    ///
    /// `All` passes everything; any other bucket rejects postings without a
    /// level. Buckets missing from the table match their own label exactly.
    pub fn matches(&self, bucket: ExperienceBucket, level: Option<&str>) -> bool {
        if bucket == ExperienceBucket::All {
            return true;
        }
        let Some(level) = level else {
            return false;
        };
        match self.members.get(&bucket) {
            Some(levels) => levels.iter().any(|l| l == level),
            None => level == bucket.label(),
        }
    }
}
