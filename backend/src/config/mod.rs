//! Configuration management for the Fit AI backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: FIT__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub vision: VisionConfig,
    pub speech: SpeechConfig,
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Whole-request backstop, answered with a 504 error envelope when it fires
    pub request_timeout_secs: u64,
}

/// Durable progress storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub progress_path: String,
}

/// Text-generation service (Google Generative Language API)
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_base: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Image-captioning service (Hugging Face Inference API)
#[derive(Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub api_base: String,
    #[serde(default)]
    pub api_token: String,
    pub model: String,
    /// Optional conditioning text sent with the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub timeout_secs: u64,
}

/// Speech-synthesis service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub api_base: String,
    pub default_lang: String,
    pub timeout_secs: u64,
}

/// Equipment photo upload limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_image_bytes: usize,
    pub allowed_types: Vec<String>,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionConfig")
            .field("api_base", &self.api_base)
            .field("api_token", &"[REDACTED]")
            .field("model", &self.model)
            .field("hint", &self.hint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api-inference.huggingface.co/models".to_string(),
            api_token: String::new(),
            model: "Salesforce/blip-image-captioning-base".to_string(),
            hint: None,
            timeout_secs: 60,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_base: "https://translate.google.com".to_string(),
            default_lang: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * 1024 * 1024, // 10 MiB
            allowed_types: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "gif".to_string(),
            ],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                request_timeout_secs: 180,
            },
            storage: StorageConfig {
                progress_path: "data/progress.json".to_string(),
            },
            llm: LlmConfig::default(),
            vision: VisionConfig::default(),
            speech: SpeechConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with FIT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(
                config::File::with_name(&config_file)
                    .required(false)
            )
            // Override with environment variables (FIT__ prefix)
            // e.g., FIT__LLM__API_KEY=... sets llm.api_key
            .add_source(
                config::Environment::with_prefix("FIT")
                    .separator("__")
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
