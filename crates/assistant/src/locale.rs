//! Language code tables.

pub const DEFAULT_LOCALE: &str = "en-IN";

/// Utterance rate the client applies to native speech.
pub const BROWSER_SPEECH_RATE: f32 = 0.9;

const LOCALES: &[(&str, &str)] = &[
    ("en", "en-IN"),
    ("hi", "hi-IN"),
    ("kn", "kn-IN"),
    ("ta", "ta-IN"),
    ("te", "te-IN"),
    ("mr", "mr-IN"),
    ("gu", "gu-IN"),
    ("bn", "bn-IN"),
    ("pa", "pa-IN"),
    ("ml", "ml-IN"),
    ("or", "or-IN"),
    ("as", "as-IN"),
    ("ur", "ur-IN"),
    ("ne", "ne-IN"),
    // Kashmiri and Sindhi have no Indian voice; Urdu is the closest.
    ("ks", "ur-IN"),
    ("sd", "ur-IN"),
];

const NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "Hindi"),
    ("kn", "Kannada"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("gu", "Gujarati"),
    ("bn", "Bengali"),
    ("pa", "Punjabi"),
    ("ml", "Malayalam"),
    ("or", "Odia"),
    ("as", "Assamese"),
    ("ur", "Urdu"),
    ("ne", "Nepali"),
    ("ks", "Kashmiri"),
    ("sd", "Sindhi"),
];

fn lookup(table: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_lowercase();
    let base = code.split(['-', '_']).next().unwrap_or_default();
    table.iter().find(|(k, _)| *k == base).map(|(_, v)| *v)
}

/// Speech locale for a language code; unknown codes use [`DEFAULT_LOCALE`].
pub fn locale_for(lang: &str) -> &'static str {
    lookup(LOCALES, lang).unwrap_or(DEFAULT_LOCALE)
}

/// English name of a language, used in model prompts.
pub fn language_name(lang: &str) -> &'static str {
    lookup(NAMES, lang).unwrap_or("English")
}
