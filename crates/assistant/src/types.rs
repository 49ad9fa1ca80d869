use serde::{Deserialize, Serialize};

use nearbykaam_jobs::JobCategory;

/// Sample rate of the mono 16-bit PCM returned by the speech model.
pub const PCM_SAMPLE_RATE_HZ: u32 = 24_000;

pub const DEFAULT_INTENT_SUMMARY: &str = "Searching...";

/// Speech output handed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Speech {
    /// Base64 raw PCM, mono, signed 16-bit little endian.
    #[serde(rename_all = "camelCase")]
    Audio { pcm_base64: String, sample_rate_hz: u32 },

    /// No audio produced; the client should use its native speech engine.
    BrowserFallback { text: String, locale: String, rate: f32 },
}

/// Filters extracted from a free-form (often spoken) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<JobCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "intentSummary")]
    pub summary: String,
}

impl Default for SearchIntent {
    fn default() -> Self {
        Self {
            category: None,
            keyword: None,
            summary: DEFAULT_INTENT_SUMMARY.to_string(),
        }
    }
}
