//! Common test utilities for integration tests
//!
//! Builds the full router over stub collaborators and a progress file in a
//! temporary directory.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fit_ai_backend::clients::{
    ClientError, ImageCaptioner, SpeechSynthesizer, TextGenerator, TextRequest,
};
use fit_ai_backend::{
    config::AppConfig,
    routes,
    services::ProgressStore,
    state::{AppState, Collaborators},
};
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::json;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "fit-ai-test-boundary";

/// Text generator that answers with the prompt it received
#[derive(Default)]
pub struct EchoGenerator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &TextRequest) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(request.prompt.clone())
    }
}

/// Text generator that is always down
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: &TextRequest) -> Result<String, ClientError> {
        Err(ClientError::Status {
            status: 500,
            message: "internal model failure at shard 7".to_string(),
        })
    }
}

/// Captioner with a fixed answer that counts its calls
pub struct StubCaptioner {
    pub caption: String,
    pub calls: AtomicUsize,
}

impl StubCaptioner {
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImageCaptioner for StubCaptioner {
    async fn caption(&self, _image: &[u8], _hint: Option<&str>) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.caption.clone())
    }
}

/// Synthesizer that returns the spoken text as bytes
pub struct StubSpeech;

#[async_trait]
impl SpeechSynthesizer for StubSpeech {
    async fn synthesize(&self, text: &str, _lang: &str) -> Result<Vec<u8>, ClientError> {
        Ok(text.as_bytes().to_vec())
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub generator: Arc<EchoGenerator>,
    pub captioner: Arc<StubCaptioner>,
    pub progress_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application with echoing collaborators
    pub async fn new() -> Self {
        let generator = Arc::new(EchoGenerator::default());
        let captioner = Arc::new(StubCaptioner::new("a pair of dumbbells"));
        let collaborators = Collaborators {
            generator: generator.clone(),
            captioner: captioner.clone(),
            synthesizer: Arc::new(StubSpeech),
        };
        Self::with_collaborators(collaborators, generator, captioner).await
    }

    /// Create a test application whose text generator always fails
    pub async fn with_failing_generator() -> Self {
        let captioner = Arc::new(StubCaptioner::new("a pair of dumbbells"));
        let collaborators = Collaborators {
            generator: Arc::new(FailingGenerator),
            captioner: captioner.clone(),
            synthesizer: Arc::new(StubSpeech),
        };
        Self::with_collaborators(collaborators, Arc::new(EchoGenerator::default()), captioner).await
    }

    async fn with_collaborators(
        collaborators: Collaborators,
        generator: Arc<EchoGenerator>,
        captioner: Arc<StubCaptioner>,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let progress_path = dir.path().join("data").join("progress.json");

        let mut config = AppConfig::default();
        config.server.port = 0;
        config.storage.progress_path = progress_path.display().to_string();

        let progress = ProgressStore::load(&progress_path).await;
        let state = AppState::new(config, collaborators, progress);

        Self {
            app: routes::create_router(state),
            generator,
            captioner,
            progress_path,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Upload bytes as the `image` field of a multipart form
    pub async fn upload_image(&self, path: &str, bytes: &[u8]) -> (StatusCode, String) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"gear.png\"\r\n\
                 Content-Type: image/png\r\n\r\n",
                b = MULTIPART_BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Submit the reference profile
    pub async fn submit_alex(&self) {
        let (status, body) = self.post("/api/v1/profile", &alex_profile().to_string()).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }
}

pub fn alex_profile() -> serde_json::Value {
    json!({
        "name": "Alex",
        "age": 29,
        "sex": "Male",
        "weight": 70.0,
        "height": 175.0,
        "goals": "lose fat",
        "country": "Canada"
    })
}

/// A small valid PNG
pub fn png_bytes() -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(8, 8, Rgb([30, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
