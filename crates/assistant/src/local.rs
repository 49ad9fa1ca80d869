//! Offline assistant: keyword matching and native-speech handoff.

use async_trait::async_trait;

use nearbykaam_jobs::{JobCategory, JobRecord};

use crate::locale::{BROWSER_SPEECH_RATE, locale_for};
use crate::{AssistantError, LanguageAssistant, SearchIntent, Speech};

type KeywordTable = &'static [(JobCategory, &'static [&'static str])];

const EN_KEYWORDS: KeywordTable = &[
    (JobCategory::Hotel, &["hotel", "restaurant", "dhaba", "cook", "waiter", "kitchen", "chef"]),
    (JobCategory::Shop, &["shop", "store", "salesman", "sales", "counter", "cashier", "retail"]),
    (JobCategory::Garage, &["garage", "mechanic", "car repair", "bike repair", "puncture"]),
    (JobCategory::Delivery, &["delivery", "driver", "courier", "rider", "logistics"]),
    (JobCategory::Construction, &["construction", "mason", "labour", "labor", "painter", "plumber", "electrician", "carpenter"]),
    (JobCategory::HouseHelp, &["house help", "maid", "housekeeping", "cleaning", "nanny", "babysitter", "caretaker"]),
    (JobCategory::Security, &["security", "guard", "watchman", "bouncer"]),
];

const HI_KEYWORDS: KeywordTable = &[
    (JobCategory::Hotel, &["होटल", "ढाबा", "रसोइया", "खाना", "वेटर", "hotel", "dhaba", "khana"]),
    (JobCategory::Shop, &["दुकान", "सेल्समैन", "dukaan", "dukan"]),
    (JobCategory::Garage, &["गैराज", "मैकेनिक", "मिस्त्री", "garage", "mistri"]),
    (JobCategory::Delivery, &["डिलीवरी", "ड्राइवर", "गाड़ी", "delivery", "driver"]),
    (JobCategory::Construction, &["निर्माण", "मजदूर", "राजमिस्त्री", "बिल्डिंग", "mazdoor", "majdoor"]),
    (JobCategory::HouseHelp, &["घर", "बाई", "सफाई", "कामवाली", "ghar", "safai"]),
    (JobCategory::Security, &["सिक्योरिटी", "गार्ड", "चौकीदार", "chowkidar", "guard"]),
];

fn keywords_for(lang: &str) -> KeywordTable {
    match lang.trim().to_ascii_lowercase().as_str() {
        "hi" | "hi-in" => HI_KEYWORDS,
        _ => EN_KEYWORDS,
    }
}

/// First category whose keyword list (for `lang`, else English) occurs in `speech`.
pub fn match_category(speech: &str, lang: &str) -> Option<JobCategory> {
    let text = speech.to_lowercase();
    keywords_for(lang)
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(&w.to_lowercase())))
        .map(|(cat, _)| *cat)
}

/// Deterministic announcement used when no model is available.
pub fn readout_script(job: &JobRecord) -> String {
    format!(
        "{} at {}. Salary {}. Expires in {} days.",
        job.title, job.employer_name, job.salary_amount, job.expiry_days
    )
}

/// Assistant that needs no network. Every call succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalAssistant;

#[async_trait]
impl LanguageAssistant for LocalAssistant {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, AssistantError> {
        Ok(text.to_string())
    }

    async fn synthesize_speech(&self, text: &str, lang: &str) -> Result<Speech, AssistantError> {
        Ok(Speech::BrowserFallback {
            text: text.to_string(),
            locale: locale_for(lang).to_string(),
            rate: BROWSER_SPEECH_RATE,
        })
    }

    async fn parse_intent(&self, query: &str, lang: &str) -> Result<SearchIntent, AssistantError> {
        let query = query.trim();
        if let Some(category) = match_category(query, lang) {
            return Ok(SearchIntent {
                category: Some(category),
                keyword: None,
                summary: category.label().to_string(),
            });
        }

        // A single word is most likely a role ("plumber"); use it as text search.
        let keyword = (!query.is_empty() && !query.contains(char::is_whitespace))
            .then(|| query.to_string());
        Ok(SearchIntent {
            keyword,
            ..SearchIntent::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_INTENT_SUMMARY;
    use chrono::TimeZone;
    use nearbykaam_core::{GeoPoint, JobId, Location};
    use nearbykaam_jobs::{ContactInfo, JobStatus, SalaryType};

    fn job() -> JobRecord {
        JobRecord {
            id: JobId::from("j1"),
            title: "Cook".into(),
            job_role: None,
            category: JobCategory::Hotel,
            industry: None,
            description: None,
            employer_id: "emp".into(),
            employer_name: "Annapurna Hotel".into(),
            employer_first_name: None,
            shop_name: None,
            contact: ContactInfo::default(),
            shop_photo: None,
            location: Location::at(GeoPoint::new(12.97, 77.59)),
            salary_amount: "15000".into(),
            salary_type: SalaryType::Month,
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
            created_at: chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            expiry_days: 15,
            experience_level: None,
            employment_type: None,
            work_mode: None,
        }
    }

    #[test]
    fn matches_english_and_hindi_keywords() {
        assert_eq!(match_category("I want a Driver job", "en"), Some(JobCategory::Delivery));
        assert_eq!(match_category("मुझे गार्ड की नौकरी चाहिए", "hi"), Some(JobCategory::Security));
        assert_eq!(match_category("something else", "en"), None);
    }

    #[test]
    fn unknown_language_uses_english_keywords() {
        assert_eq!(match_category("mechanic", "ta"), Some(JobCategory::Garage));
    }

    #[test]
    fn readout_has_fixed_shape() {
        assert_eq!(
            readout_script(&job()),
            "Cook at Annapurna Hotel. Salary 15000. Expires in 15 days."
        );
    }

    #[tokio::test]
    async fn intent_from_keywords() {
        let a = LocalAssistant;
        let i = a.parse_intent("need hotel work", "en").await.unwrap();
        assert_eq!(i.category, Some(JobCategory::Hotel));

        let i = a.parse_intent("tailor", "en").await.unwrap();
        assert_eq!(i.category, None);
        assert_eq!(i.keyword.as_deref(), Some("tailor"));
        assert_eq!(i.summary, DEFAULT_INTENT_SUMMARY);

        let i = a.parse_intent("any work nearby please", "en").await.unwrap();
        assert_eq!(i, SearchIntent::default());
    }

    #[tokio::test]
    async fn speech_hands_off_to_browser() {
        let s = LocalAssistant.synthesize_speech("Namaste", "hi").await.unwrap();
        assert_eq!(
            s,
            Speech::BrowserFallback {
                text: "Namaste".into(),
                locale: "hi-IN".into(),
                rate: BROWSER_SPEECH_RATE,
            }
        );
        assert_eq!(LocalAssistant.job_readout(&job(), "hi").await.unwrap(), readout_script(&job()));
    }
}
