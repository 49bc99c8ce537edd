//! Hugging Face Inference API image captioning

use super::{http_client, ClientError, ImageCaptioner};
use crate::config::VisionConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, instrument};

#[derive(Debug, Serialize)]
struct HintedRequest<'a> {
    inputs: String,
    parameters: HintParameters<'a>,
}

#[derive(Debug, Serialize)]
struct HintParameters<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct Caption {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

/// Captioner backed by a hosted image-to-text model
pub struct HuggingFaceCaptioner {
    client: reqwest::Client,
    endpoint: String,
    api_token: SecretString,
}

impl HuggingFaceCaptioner {
    pub fn new(config: &VisionConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            endpoint: format!("{}/{}", config.api_base.trim_end_matches('/'), config.model),
            api_token: SecretString::new(config.api_token.clone()),
        })
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.api_token.expose_secret();
        if token.is_empty() {
            builder
        } else {
            builder.bearer_auth(token)
        }
    }
}

#[async_trait]
impl ImageCaptioner for HuggingFaceCaptioner {
    #[instrument(skip(self, image), fields(bytes = image.len(), hinted = hint.is_some()))]
    async fn caption(&self, image: &[u8], hint: Option<&str>) -> Result<String, ClientError> {
        if image.is_empty() {
            return Err(ClientError::InvalidRequest("image is empty".to_string()));
        }

        let builder = self.authorized(self.client.post(&self.endpoint));
        let builder = match hint {
            Some(text) => builder.json(&HintedRequest {
                inputs: STANDARD.encode(image),
                parameters: HintParameters { text },
            }),
            None => builder
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(image.to_vec()),
        };

        debug!("Requesting image caption");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<InferenceError>(&body)
                .map_or(body, |e| e.error);
            error!(status = %status, %message, "Captioning API error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let captions: Vec<Caption> =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;

        let caption = captions
            .into_iter()
            .map(|c| c.generated_text.trim().to_string())
            .find(|c| !c.is_empty())
            .ok_or(ClientError::Empty)?;

        debug!(%caption, "Received caption");
        Ok(caption)
    }
}

impl fmt::Debug for HuggingFaceCaptioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceCaptioner")
            .field("endpoint", &self.endpoint)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
