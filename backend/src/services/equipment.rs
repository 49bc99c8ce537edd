//! Equipment workout orchestration
//!
//! Checks that an uploaded photo is a readable image, asks the captioning
//! service what equipment it shows, then asks the text-generation service
//! for a workout built around that equipment.

use super::plan::stage_error;
use super::prompts;
use crate::clients::{ImageCaptioner, TextGenerator};
use crate::config::UploadConfig;
use fit_ai_shared::{
    EquipmentPlanResult, InvalidInputError, ServiceError, ServiceStage, UserProfile,
};
use image::ImageFormat;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EquipmentError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Reject anything that is not a decodable image of an accepted type
pub fn check_image(bytes: &[u8], limits: &UploadConfig) -> Result<ImageFormat, InvalidInputError> {
    if bytes.is_empty() {
        return Err(InvalidInputError::Empty);
    }
    if bytes.len() > limits.max_image_bytes {
        return Err(InvalidInputError::TooLarge {
            size: bytes.len(),
            max: limits.max_image_bytes,
        });
    }

    let format = image::guess_format(bytes).map_err(|_| InvalidInputError::NotAnImage)?;
    let accepted = format.extensions_str().iter().any(|ext| {
        limits
            .allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    });
    if !accepted {
        return Err(InvalidInputError::UnsupportedFormat(format!("{:?}", format).to_lowercase()));
    }

    // Magic bytes alone are not enough; a truncated file must not reach the captioner
    image::load_from_memory_with_format(bytes, format).map_err(|e| {
        warn!(error = %e, "Uploaded image failed to decode");
        InvalidInputError::NotAnImage
    })?;

    Ok(format)
}

#[derive(Clone)]
pub struct EquipmentOrchestrator {
    captioner: Arc<dyn ImageCaptioner>,
    generator: Arc<dyn TextGenerator>,
    limits: UploadConfig,
    caption_hint: Option<String>,
}

impl EquipmentOrchestrator {
    pub fn new(
        captioner: Arc<dyn ImageCaptioner>,
        generator: Arc<dyn TextGenerator>,
        limits: UploadConfig,
        caption_hint: Option<String>,
    ) -> Self {
        Self {
            captioner,
            generator,
            limits,
            caption_hint,
        }
    }

    #[instrument(skip(self, profile, image), fields(bytes = image.len()))]
    pub async fn generate_equipment_plan(
        &self,
        profile: &UserProfile,
        image: &[u8],
    ) -> Result<EquipmentPlanResult, EquipmentError> {
        let format = check_image(image, &self.limits)?;
        debug!(?format, "Image accepted");

        let equipment_description = self
            .captioner
            .caption(image, self.caption_hint.as_deref())
            .await
            .map_err(|e| stage_error(ServiceStage::Captioning, e))?;

        let plan_text = self
            .generator
            .generate(&prompts::equipment_request(profile, &equipment_description))
            .await
            .map_err(|e| stage_error(ServiceStage::EquipmentPlan, e))?;

        info!(equipment = %equipment_description, "Equipment workout generated");
        Ok(EquipmentPlanResult {
            equipment_description,
            plan_text,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clients::ClientError;
    use crate::services::plan::tests::EchoGenerator;
    use crate::services::prompts::tests::alex;
    use async_trait::async_trait;
    use image::{ImageBuffer, Rgb};
    use proptest::prelude::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn png_bytes() -> Vec<u8> {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(4, 4, Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    pub(crate) struct FixedCaptioner {
        pub(crate) caption: &'static str,
        pub(crate) calls: AtomicUsize,
    }

    impl FixedCaptioner {
        pub(crate) fn new(caption: &'static str) -> Self {
            Self {
                caption,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ImageCaptioner for FixedCaptioner {
        async fn caption(&self, _image: &[u8], _hint: Option<&str>) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.caption.is_empty() {
                return Err(ClientError::Empty);
            }
            Ok(self.caption.to_string())
        }
    }

    fn orchestrator(captioner: Arc<FixedCaptioner>) -> EquipmentOrchestrator {
        EquipmentOrchestrator::new(
            captioner,
            Arc::new(EchoGenerator::default()),
            UploadConfig::default(),
            None,
        )
    }

    #[test]
    fn test_check_image_accepts_png() {
        assert_eq!(check_image(&png_bytes(), &UploadConfig::default()), Ok(ImageFormat::Png));
    }

    #[test]
    fn test_check_image_rejects_garbage_and_empty() {
        let limits = UploadConfig::default();
        assert_eq!(check_image(b"not an image at all", &limits), Err(InvalidInputError::NotAnImage));
        assert_eq!(check_image(&[], &limits), Err(InvalidInputError::Empty));
    }

    #[test]
    fn test_check_image_rejects_truncated_png() {
        let bytes = png_bytes();
        let truncated = &bytes[..bytes.len() / 2];
        assert_eq!(check_image(truncated, &UploadConfig::default()), Err(InvalidInputError::NotAnImage));
    }

    #[test]
    fn test_check_image_enforces_limits() {
        let limits = UploadConfig {
            max_image_bytes: 10,
            ..UploadConfig::default()
        };
        assert!(matches!(
            check_image(&png_bytes(), &limits),
            Err(InvalidInputError::TooLarge { max: 10, .. })
        ));

        let jpeg_only = UploadConfig {
            allowed_types: vec!["jpg".to_string()],
            ..UploadConfig::default()
        };
        assert_eq!(
            check_image(&png_bytes(), &jpeg_only),
            Err(InvalidInputError::UnsupportedFormat("png".to_string()))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_random_bytes_rejected(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert!(check_image(&bytes, &UploadConfig::default()).is_err());
        }
    }

    #[tokio::test]
    async fn test_garbage_upload_never_reaches_captioner() {
        let captioner = Arc::new(FixedCaptioner::new("a dumbbell"));
        let err = orchestrator(captioner.clone())
            .generate_equipment_plan(&alex(), b"garbage bytes")
            .await
            .unwrap_err();

        assert_eq!(err, EquipmentError::InvalidInput(InvalidInputError::NotAnImage));
        assert_eq!(captioner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_plan_built_from_caption() {
        let captioner = Arc::new(FixedCaptioner::new("a pair of dumbbells"));
        let result = orchestrator(captioner)
            .generate_equipment_plan(&alex(), &png_bytes())
            .await
            .unwrap();

        assert_eq!(result.equipment_description, "a pair of dumbbells");
        assert!(result.plan_text.contains("Equipments: a pair of dumbbells"));
        assert!(!result.plan_text.contains("Canada"));
    }

    #[tokio::test]
    async fn test_caption_failure_names_stage() {
        let captioner = Arc::new(FixedCaptioner::new(""));
        let err = orchestrator(captioner)
            .generate_equipment_plan(&alex(), &png_bytes())
            .await
            .unwrap_err();

        match err {
            EquipmentError::Service(e) => assert_eq!(e.stage, ServiceStage::Captioning),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
