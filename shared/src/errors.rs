//! Error types for the Fit AI coaching workflow

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stage of a multi-step orchestration that talks to an external service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStage {
    /// Full plan generation by the text-generation service
    Generation,
    /// Plan summarization for narration
    Summarization,
    /// Speech synthesis of the narration script
    Synthesis,
    /// Image captioning of uploaded equipment
    Captioning,
    /// Equipment-conditioned plan generation
    EquipmentPlan,
}

impl ServiceStage {
    /// Human-readable name of the stage
    pub fn description(&self) -> &'static str {
        match self {
            ServiceStage::Generation => "plan generation",
            ServiceStage::Summarization => "plan summarization",
            ServiceStage::Synthesis => "speech synthesis",
            ServiceStage::Captioning => "equipment recognition",
            ServiceStage::EquipmentPlan => "equipment workout planning",
        }
    }
}

impl fmt::Display for ServiceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An external AI or speech call failed
///
/// `message` is a short explanation safe to show to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} failed: {message}")]
pub struct ServiceError {
    pub stage: ServiceStage,
    pub message: String,
}

impl ServiceError {
    pub fn new(stage: ServiceStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Malformed user upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Uploaded file is too large ({size} bytes, maximum {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Uploaded file is not a readable image")]
    NotAnImage,
}

/// Durable progress storage failure
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Progress file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Progress file serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
