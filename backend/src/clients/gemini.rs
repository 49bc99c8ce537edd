//! Google Gemini text-generation client
//!
//! Calls the Generative Language API `generateContent` method with the
//! system instruction in its dedicated field and the prompt as a single
//! user turn.

use super::{http_client, ClientError, TextGenerator, TextRequest};
use crate::config::LlmConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, instrument};

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiContent,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Gemini-backed [`TextGenerator`]
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    api_key: SecretString,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: SecretString::new(config.api_key.clone()),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn build_request(&self, request: &TextRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            system_instruction: GeminiContent {
                role: None,
                parts: vec![Part {
                    text: Some(request.system_instruction.clone()),
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
                candidate_count: 1,
            },
        }
    }

    /// Join the text parts of the first candidate
    fn extract_text(response: GeminiResponse) -> Result<String, ClientError> {
        let parts = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .ok_or_else(|| ClientError::Parse("no candidates in response".to_string()))?;

        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(ClientError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &TextRequest) -> Result<String, ClientError> {
        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&self.build_request(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map_or(body, |e| e.message);
            error!(status = %status, %message, "Gemini API error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            ClientError::Parse(e.to_string())
        })?;

        if let Some(err) = parsed.error {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: err.message,
            });
        }

        let text = Self::extract_text(parsed)?;
        debug!(chars = text.len(), "Received Gemini response");
        Ok(text)
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
