//! External AI collaborators
//!
//! Each hosted service sits behind a small trait so orchestrators can be
//! exercised with stubs:
//! - [`TextGenerator`]: prompt in, free-form text out
//! - [`ImageCaptioner`]: image bytes in, short caption out
//! - [`SpeechSynthesizer`]: text in, encoded audio out

pub mod captioning;
pub mod gemini;
pub mod speech;

pub use captioning::HuggingFaceCaptioner;
pub use gemini::GeminiClient;
pub use speech::GoogleTtsClient;

use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to a hosted service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response format: {0}")]
    Parse(String),

    #[error("Service returned an empty response")]
    Empty,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Short explanation suitable for end users
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) if e.is_timeout() => "the service timed out".to_string(),
            ClientError::Http(_) => "the service could not be reached".to_string(),
            ClientError::Status { status: 429, .. } => {
                "the service is busy, please try again shortly".to_string()
            }
            ClientError::Status { status, .. } if *status >= 500 => {
                "the service is temporarily unavailable".to_string()
            }
            ClientError::Status { status, .. } => format!("the service rejected the request ({})", status),
            ClientError::Parse(_) => "the service returned an unexpected response".to_string(),
            ClientError::Empty => "the service returned no content".to_string(),
            ClientError::InvalidRequest(reason) => reason.clone(),
        }
    }
}

/// One request to the text-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    /// Role-fixing instruction for the model
    pub system_instruction: String,
    /// The human turn
    pub prompt: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &TextRequest) -> Result<String, ClientError>;
}

#[async_trait]
pub trait ImageCaptioner: Send + Sync {
    /// Caption an image, optionally conditioned on a text hint
    async fn caption(&self, image: &[u8], hint: Option<&str>) -> Result<String, ClientError>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech for `text` in language `lang`, returning MP3 bytes
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, ClientError>;
}

/// Build the shared HTTP client with a per-request timeout
pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("fit-ai-backend/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
