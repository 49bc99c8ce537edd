//! Plan orchestration
//!
//! Produces a personalized regime and its spoken summary in three strictly
//! sequential stages:
//! 1. Generation: advisor instruction plus every profile field
//! 2. Summarization: the generated plan text, unmodified
//! 3. Synthesis: the markdown-stripped summary in the requested language
//!
//! The first failing stage aborts the run; nothing partial is returned.

use super::prompts;
use crate::clients::{ClientError, SpeechSynthesizer, TextGenerator};
use fit_ai_shared::narration::clean_markdown;
use fit_ai_shared::{PlanResult, ServiceError, ServiceStage, UserProfile};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Attach the failing stage to a collaborator error
pub(crate) fn stage_error(stage: ServiceStage, err: ClientError) -> ServiceError {
    error!(stage = %stage, error = %err, "External service call failed");
    ServiceError::new(stage, err.user_message())
}

/// Plan orchestrator over a text generator and a speech synthesizer
#[derive(Clone)]
pub struct PlanOrchestrator {
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl PlanOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            generator,
            synthesizer,
        }
    }

    /// Generate a plan for `profile` and narrate its summary in `lang`
    #[instrument(skip(self, profile))]
    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
        lang: &str,
    ) -> Result<PlanResult, ServiceError> {
        let full_plan_text = self
            .generator
            .generate(&prompts::plan_request(profile))
            .await
            .map_err(|e| stage_error(ServiceStage::Generation, e))?;

        let summary = self
            .generator
            .generate(&prompts::summary_request(&full_plan_text))
            .await
            .map_err(|e| stage_error(ServiceStage::Summarization, e))?;

        let script = clean_markdown(&summary);
        let narration_audio = self
            .synthesizer
            .synthesize(&script, lang)
            .await
            .map_err(|e| stage_error(ServiceStage::Synthesis, e))?;

        info!(
            plan_chars = full_plan_text.len(),
            audio_bytes = narration_audio.len(),
            "Plan generated"
        );

        Ok(PlanResult {
            full_plan_text,
            narration_audio,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clients::TextRequest;
    use crate::services::prompts::tests::alex;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the prompt it was given, records every request
    #[derive(Default)]
    pub(crate) struct EchoGenerator {
        pub(crate) requests: Mutex<Vec<TextRequest>>,
        pub(crate) fail_on_call: Option<usize>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, request: &TextRequest) -> Result<String, ClientError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            if self.fail_on_call == Some(requests.len()) {
                return Err(ClientError::Status {
                    status: 503,
                    message: "overloaded".to_string(),
                });
            }
            Ok(request.prompt.clone())
        }
    }

    /// Returns the spoken text as bytes
    #[derive(Default)]
    pub(crate) struct TextAsAudio {
        pub(crate) calls: Mutex<Vec<(String, String)>>,
        pub(crate) fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for TextAsAudio {
        async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, ClientError> {
            self.calls.lock().unwrap().push((text.to_string(), lang.to_string()));
            if self.fail {
                return Err(ClientError::Empty);
            }
            Ok(text.as_bytes().to_vec())
        }
    }

    fn orchestrator(
        generator: Arc<EchoGenerator>,
        speech: Arc<TextAsAudio>,
    ) -> PlanOrchestrator {
        PlanOrchestrator::new(generator, speech)
    }

    #[tokio::test]
    async fn test_echo_plan_contains_profile() {
        let generator = Arc::new(EchoGenerator::default());
        let speech = Arc::new(TextAsAudio::default());
        let result = orchestrator(generator.clone(), speech.clone())
            .generate_plan(&alex(), "en")
            .await
            .unwrap();

        assert!(result.full_plan_text.contains("Alex"));
        assert!(result.full_plan_text.contains("lose fat"));
        assert!(!result.narration_audio.is_empty());

        let requests = generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].system_instruction, prompts::ADVISOR_INSTRUCTION);
        assert_eq!(requests[1].system_instruction, prompts::SUMMARIZER_INSTRUCTION);
        assert_eq!(requests[1].prompt, result.full_plan_text);
    }

    #[tokio::test]
    async fn test_narration_text_is_cleaned() {
        let generator = Arc::new(EchoGenerator::default());
        let speech = Arc::new(TextAsAudio::default());
        orchestrator(generator, speech.clone())
            .generate_plan(&alex(), "fr")
            .await
            .unwrap();

        let calls = speech.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "fr");
        assert!(!calls[0].0.contains('\n'));
    }

    #[tokio::test]
    async fn test_summarization_failure_names_stage_and_skips_speech() {
        let generator = Arc::new(EchoGenerator {
            fail_on_call: Some(2),
            ..Default::default()
        });
        let speech = Arc::new(TextAsAudio::default());
        let err = orchestrator(generator, speech.clone())
            .generate_plan(&alex(), "en")
            .await
            .unwrap_err();

        assert_eq!(err.stage, ServiceStage::Summarization);
        assert!(!err.message.contains("overloaded"));
        assert!(speech.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_stops_pipeline() {
        let generator = Arc::new(EchoGenerator {
            fail_on_call: Some(1),
            ..Default::default()
        });
        let speech = Arc::new(TextAsAudio::default());
        let err = orchestrator(generator.clone(), speech)
            .generate_plan(&alex(), "en")
            .await
            .unwrap_err();

        assert_eq!(err.stage, ServiceStage::Generation);
        assert_eq!(generator.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_failure_names_stage() {
        let speech = Arc::new(TextAsAudio {
            fail: true,
            ..Default::default()
        });
        let err = orchestrator(Arc::new(EchoGenerator::default()), speech)
            .generate_plan(&alex(), "en")
            .await
            .unwrap_err();
        assert_eq!(err.stage, ServiceStage::Synthesis);
    }
}
