//! Today's workout routine and its spoken instructions

use super::plan::stage_error;
use crate::clients::SpeechSynthesizer;
use base64::{engine::general_purpose::STANDARD, Engine};
use fit_ai_shared::{default_routine, ServiceError, ServiceStage, WorkoutCard};
use tracing::instrument;

/// Encode MP3 bytes as an inline `data:` URI
pub fn audio_data_uri(audio: &[u8]) -> String {
    format!("data:audio/mpeg;base64,{}", STANDARD.encode(audio))
}

/// Spoken instructions for one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct Narration {
    pub text: String,
    pub audio: Vec<u8>,
}

pub struct WorkoutService;

impl WorkoutService {
    pub fn today() -> Vec<WorkoutCard> {
        default_routine()
    }

    /// Card at `index` in today's routine
    pub fn card(index: usize) -> Option<WorkoutCard> {
        Self::today().into_iter().nth(index)
    }

    #[instrument(skip(synthesizer, card), fields(exercise = %card.exercise))]
    pub async fn narrate(
        synthesizer: &dyn SpeechSynthesizer,
        card: &WorkoutCard,
        lang: &str,
    ) -> Result<Narration, ServiceError> {
        let text = card.instructions();
        let audio = synthesizer
            .synthesize(&text, lang)
            .await
            .map_err(|e| stage_error(ServiceStage::Synthesis, e))?;
        Ok(Narration { text, audio })
    }
}
