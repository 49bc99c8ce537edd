//! Google Translate text-to-speech client
//!
//! The endpoint only accepts short inputs, so text is split with
//! [`split_for_speech`] and the MP3 segments are concatenated in order.
//! MP3 frames are self-delimiting, so the joined bytes play as one stream.

use super::{http_client, ClientError, SpeechSynthesizer};
use crate::config::SpeechConfig;
use async_trait::async_trait;
use fit_ai_shared::narration::{split_for_speech, MAX_SPEECH_CHUNK_CHARS};
use tracing::{debug, error, instrument};

#[derive(Debug)]
pub struct GoogleTtsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTtsClient {
    pub fn new(config: &SpeechConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: http_client(config.timeout_secs)?,
            endpoint: format!("{}/translate_tts", config.api_base.trim_end_matches('/')),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, ClientError> {
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", lang),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = %status, "Speech API error");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, ClientError> {
        if lang.trim().is_empty() {
            return Err(ClientError::InvalidRequest("language code is empty".to_string()));
        }

        let chunks = split_for_speech(text, MAX_SPEECH_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ClientError::InvalidRequest("no text to speak".to_string()));
        }

        debug!(chunks = chunks.len(), "Synthesizing speech");
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, lang, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(ClientError::Empty);
        }
        Ok(audio)
    }
}
