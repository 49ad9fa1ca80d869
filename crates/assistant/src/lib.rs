//! `nearbykaam-assistant`
//!
//! Multilingual helper for workers who read little: translation, job
//! readouts as speech, and turning a spoken query into feed filters.
//!
//! This crate sits outside the feed. The feed never waits on it, and a
//! remote failure degrades to [`LocalAssistant`] rather than an error.

pub mod error;
pub mod fallback;
pub mod gemini;
pub mod locale;
pub mod local;
pub mod types;

pub use error::AssistantError;
pub use fallback::FallbackAssistant;
pub use gemini::{GeminiAssistant, GeminiConfig};
pub use local::LocalAssistant;
pub use locale::{BROWSER_SPEECH_RATE, DEFAULT_LOCALE, language_name, locale_for};
pub use types::{DEFAULT_INTENT_SUMMARY, PCM_SAMPLE_RATE_HZ, SearchIntent, Speech};

use async_trait::async_trait;
use nearbykaam_jobs::JobRecord;

/// Language capabilities the API exposes to workers.
#[async_trait]
pub trait LanguageAssistant: Send + Sync + 'static {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AssistantError>;

    async fn synthesize_speech(&self, text: &str, lang: &str) -> Result<Speech, AssistantError>;

    async fn parse_intent(&self, query: &str, lang: &str) -> Result<SearchIntent, AssistantError>;

    /// Short spoken announcement for a job.
    async fn job_readout(&self, job: &JobRecord, lang: &str) -> Result<String, AssistantError> {
        let _ = lang;
        Ok(local::readout_script(job))
    }
}
