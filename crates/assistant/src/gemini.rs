//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use nearbykaam_jobs::{JobCategory, JobRecord};

use crate::locale::language_name;
use crate::{AssistantError, DEFAULT_INTENT_SUMMARY, LanguageAssistant, PCM_SAMPLE_RATE_HZ, SearchIntent, Speech};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub tts_model: String,
    pub voice: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: "gemini-3-flash-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            voice: "Kore".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct GeminiAssistant {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAssistant {
    pub fn new(config: GeminiConfig) -> Result<Self, AssistantError> {
        if config.api_key.trim().is_empty() {
            return Err(AssistantError::Unavailable("empty Gemini API key".into()));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn generate(&self, model: &str, body: &Value) -> Result<GenerateResponse, AssistantError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        );
        debug!(model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, "Gemini API error: {body}");
            return Err(AssistantError::Upstream { status, body });
        }

        Ok(response.json::<GenerateResponse>().await?)
    }

    async fn generate_text(&self, body: &Value) -> Result<String, AssistantError> {
        let response = self.generate(&self.config.text_model, body).await?;
        response
            .first_text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AssistantError::MalformedResponse("no text in candidate".into()))
    }
}

#[async_trait]
impl LanguageAssistant for GeminiAssistant {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, AssistantError> {
        let prompt = format!(
            "Translate the following text to {}. Return ONLY the translated text.\n\n{}",
            language_name(target_lang),
            text
        );
        self.generate_text(&text_request(&prompt)).await
    }

    async fn synthesize_speech(&self, text: &str, _lang: &str) -> Result<Speech, AssistantError> {
        let response = self
            .generate(&self.config.tts_model, &speech_request(text, &self.config.voice))
            .await?;
        let pcm_base64 = response
            .first_inline_data()
            .ok_or_else(|| AssistantError::MalformedResponse("no audio in candidate".into()))?;
        Ok(Speech::Audio {
            pcm_base64: pcm_base64.to_string(),
            sample_rate_hz: PCM_SAMPLE_RATE_HZ,
        })
    }

    async fn parse_intent(&self, query: &str, lang: &str) -> Result<SearchIntent, AssistantError> {
        let raw = self.generate_text(&intent_request(query, language_name(lang))).await?;
        parse_intent_json(&raw)
    }

    async fn job_readout(&self, job: &JobRecord, lang: &str) -> Result<String, AssistantError> {
        self.generate_text(&text_request(&readout_prompt(job, language_name(lang))))
            .await
    }
}

fn text_request(prompt: &str) -> Value {
    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

fn speech_request(text: &str, voice: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": text }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } }
            }
        }
    })
}

fn intent_request(query: &str, lang_name: &str) -> Value {
    let categories = JobCategory::ALL
        .iter()
        .map(|c| c.key())
        .collect::<Vec<_>>()
        .join(", ");
    json!({
        "systemInstruction": { "parts": [{ "text": format!(
            "The user query is in {lang_name}. Extract job intent for NearbyKaam.\n\
             Categories: {categories}.\n\
             Return JSON with category, keyword, and a short intentSummary in {lang_name}."
        ) }] },
        "contents": [{ "parts": [{ "text": format!("User Query: \"{query}\"") }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "category": { "type": "STRING" },
                    "keyword": { "type": "STRING" },
                    "intentSummary": { "type": "STRING" }
                },
                "required": ["intentSummary"]
            }
        }
    })
}

fn readout_prompt(job: &JobRecord, lang_name: &str) -> String {
    let role = job.display_role();
    let address = job.location.address.as_deref().unwrap_or_default();
    let per = match job.salary_type {
        nearbykaam_jobs::SalaryType::Day => "DAY",
        nearbykaam_jobs::SalaryType::Month => "MONTH",
    };
    format!(
        "Create a very natural sounding job announcement for a voice readout in {lang_name}.\n\
         This is for a blue-collar worker discovery app called NearbyKaam.\n\n\
         Job Details:\n\
         - Role: {role}\n\
         - Employer: {employer}\n\
         - Location: {address}\n\
         - Salary: {amount} per {per}\n\
         - Expiry: {days} days remaining\n\n\
         Requirements:\n\
         1. Use the target language {lang_name} naturally.\n\
         2. Keep it under 25 words.\n\
         3. Start with something friendly like \"New job found!\"\n\
         4. State the role, employer and location.\n\
         5. State the salary.\n\
         6. State that the job expires in {days} days.\n\
         7. Output ONLY the localized spoken text, nothing else.",
        employer = job.employer_name,
        amount = job.salary_amount,
        days = job.expiry_days,
    )
}

#[derive(Debug, Deserialize)]
struct IntentPayload {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default, rename = "intentSummary")]
    intent_summary: Option<String>,
}

/// Model output to [`SearchIntent`]. Unknown categories and blank fields are dropped.
fn parse_intent_json(raw: &str) -> Result<SearchIntent, AssistantError> {
    let payload: IntentPayload = serde_json::from_str(raw)
        .map_err(|e| AssistantError::MalformedResponse(e.to_string()))?;

    let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    Ok(SearchIntent {
        category: non_blank(payload.category).and_then(|c| JobCategory::from_key(&c)),
        keyword: non_blank(payload.keyword),
        summary: non_blank(payload.intent_summary).unwrap_or_else(|| DEFAULT_INTENT_SUMMARY.to_string()),
    })
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

impl GenerateResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    fn first_inline_data(&self) -> Option<&str> {
        self.parts().find_map(|p| p.inline_data.as_ref().map(|d| d.data.as_str()))
    }
}
