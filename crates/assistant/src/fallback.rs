use async_trait::async_trait;
use tracing::warn;

use nearbykaam_jobs::JobRecord;

use crate::{AssistantError, LanguageAssistant, LocalAssistant, SearchIntent, Speech};

/// Tries `primary`, answers from `fallback` on any error.
///
/// With [`LocalAssistant`] as the fallback no call ever fails.
pub struct FallbackAssistant<P, F = LocalAssistant> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackAssistant<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P> FallbackAssistant<P, LocalAssistant> {
    pub fn with_local(primary: P) -> Self {
        Self::new(primary, LocalAssistant)
    }
}

#[async_trait]
impl<P, F> LanguageAssistant for FallbackAssistant<P, F>
where
    P: LanguageAssistant,
    F: LanguageAssistant,
{
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AssistantError> {
        match self.primary.translate(text, target_lang).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, "translate failed, using fallback");
                self.fallback.translate(text, target_lang).await
            }
        }
    }

    async fn synthesize_speech(&self, text: &str, lang: &str) -> Result<Speech, AssistantError> {
        match self.primary.synthesize_speech(text, lang).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, "speech synthesis failed, using fallback");
                self.fallback.synthesize_speech(text, lang).await
            }
        }
    }

    async fn parse_intent(&self, query: &str, lang: &str) -> Result<SearchIntent, AssistantError> {
        match self.primary.parse_intent(query, lang).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, "intent parsing failed, using fallback");
                self.fallback.parse_intent(query, lang).await
            }
        }
    }

    async fn job_readout(&self, job: &JobRecord, lang: &str) -> Result<String, AssistantError> {
        match self.primary.job_readout(job, lang).await {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(error = %e, job_id = %job.id, "readout failed, using fallback");
                self.fallback.job_readout(job, lang).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BROWSER_SPEECH_RATE;
    use nearbykaam_jobs::JobCategory;

    struct Down;

    #[async_trait]
    impl LanguageAssistant for Down {
        async fn translate(&self, _: &str, _: &str) -> Result<String, AssistantError> {
            Err(AssistantError::Upstream { status: 503, body: "down".into() })
        }
        async fn synthesize_speech(&self, _: &str, _: &str) -> Result<Speech, AssistantError> {
            Err(AssistantError::Upstream { status: 503, body: "down".into() })
        }
        async fn parse_intent(&self, _: &str, _: &str) -> Result<SearchIntent, AssistantError> {
            Err(AssistantError::MalformedResponse("garbage".into()))
        }
    }

    struct Fixed;

    #[async_trait]
    impl LanguageAssistant for Fixed {
        async fn translate(&self, _: &str, _: &str) -> Result<String, AssistantError> {
            Ok("नमस्ते".into())
        }
        async fn synthesize_speech(&self, _: &str, _: &str) -> Result<Speech, AssistantError> {
            Ok(Speech::Audio { pcm_base64: "AAAA".into(), sample_rate_hz: 24_000 })
        }
        async fn parse_intent(&self, _: &str, _: &str) -> Result<SearchIntent, AssistantError> {
            Ok(SearchIntent { category: Some(JobCategory::Shop), keyword: None, summary: "Shop".into() })
        }
    }

    #[tokio::test]
    async fn primary_answer_wins() {
        let a = FallbackAssistant::with_local(Fixed);
        assert_eq!(a.translate("hello", "hi").await.unwrap(), "नमस्ते");
        assert!(matches!(a.synthesize_speech("x", "hi").await.unwrap(), Speech::Audio { .. }));
    }

    #[tokio::test]
    async fn failures_degrade_to_local() {
        let a = FallbackAssistant::with_local(Down);
        assert_eq!(a.translate("hello", "hi").await.unwrap(), "hello");

        match a.synthesize_speech("hello", "ta").await.unwrap() {
            Speech::BrowserFallback { locale, rate, .. } => {
                assert_eq!(locale, "ta-IN");
                assert_eq!(rate, BROWSER_SPEECH_RATE);
            }
            other => panic!("unexpected {other:?}"),
        }

        let intent = a.parse_intent("security guard", "en").await.unwrap();
        assert_eq!(intent.category, Some(JobCategory::Security));
    }
}
