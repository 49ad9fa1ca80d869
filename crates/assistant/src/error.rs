use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant not configured: {0}")]
    Unavailable(String),

    #[error("request to language service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("language service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed response from language service: {0}")]
    MalformedResponse(String),
}
