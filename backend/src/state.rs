//! Application state management
//!
//! The shared state passed to every handler via Axum's state extraction.
//! All fields are `Arc`s, so cloning per request is cheap.

use crate::clients::{
    GeminiClient, GoogleTtsClient, HuggingFaceCaptioner, ImageCaptioner, SpeechSynthesizer,
    TextGenerator,
};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::services::{EquipmentOrchestrator, PlanOrchestrator, ProgressStore, Session};
use fit_ai_shared::UserProfile;
use std::sync::Arc;
use tokio::sync::Mutex;

/// External collaborators the orchestrators talk to
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn TextGenerator>,
    pub captioner: Arc<dyn ImageCaptioner>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl Collaborators {
    /// Hosted-service clients built from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            generator: Arc::new(GeminiClient::new(&config.llm)?),
            captioner: Arc::new(HuggingFaceCaptioner::new(&config.vision)?),
            synthesizer: Arc::new(GoogleTtsClient::new(&config.speech)?),
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub plans: PlanOrchestrator,
    pub equipment: EquipmentOrchestrator,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    /// The single user session; writes are serialized through this lock
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: AppConfig, collaborators: Collaborators, progress: ProgressStore) -> Self {
        let plans = PlanOrchestrator::new(
            collaborators.generator.clone(),
            collaborators.synthesizer.clone(),
        );
        let equipment = EquipmentOrchestrator::new(
            collaborators.captioner,
            collaborators.generator,
            config.upload.clone(),
            config.vision.hint.clone(),
        );

        Self {
            config: Arc::new(config),
            plans,
            equipment,
            synthesizer: collaborators.synthesizer,
            session: Arc::new(Mutex::new(Session::new(progress))),
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Language for narration, falling back to the configured default
    pub fn narration_lang(&self, requested: Option<String>) -> String {
        requested
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.config.speech.default_lang.clone())
    }

    /// Clone the current profile out of the session
    ///
    /// Orchestrators work on the copy so the session lock is released before
    /// any external call.
    pub async fn require_profile(&self) -> Result<UserProfile, ApiError> {
        self.session
            .lock()
            .await
            .profile()
            .cloned()
            .ok_or_else(|| {
                ApiError::ProfileRequired("Submit a valid profile before generating plans".to_string())
            })
    }
}
