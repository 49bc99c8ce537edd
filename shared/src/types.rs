//! API request and response types

use crate::models::{Intensity, Mood, ProgressEntry, UserProfile, WorkoutCard, WorkoutHistoryEntry};
use crate::validation::validate_weight;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Stored profile as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub name: String,
    pub age: u32,
    pub sex: String,
    pub weight: f64,
    pub height: f64,
    pub goals: String,
    pub country: String,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(p: &UserProfile) -> Self {
        Self {
            name: p.name().to_string(),
            age: p.age(),
            sex: p.sex().to_string(),
            weight: p.weight(),
            height: p.height(),
            goals: p.goals().to_string(),
            country: p.country().to_string(),
        }
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// Options for plan generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Narration language code (defaults to the configured language)
    #[serde(default)]
    pub lang: Option<String>,
}

/// Generated plan with its narration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: String,
    /// `data:audio/mpeg;base64,...` URI for inline playback
    pub narration_audio: String,
}

/// Workout plan built around photographed equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentPlanResponse {
    pub equipment: String,
    pub plan: String,
}

// ============================================================================
// Workout Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTodayResponse {
    pub exercises: Vec<WorkoutCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NarrationRequest {
    #[serde(default)]
    pub lang: Option<String>,
}

/// Spoken instructions for one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationResponse {
    pub text: String,
    pub audio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutHistoryResponse {
    pub entries: Vec<WorkoutHistoryEntry>,
}

// ============================================================================
// Progress Types
// ============================================================================

/// Progress check-in request; the date is assigned by the server
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogProgressRequest {
    #[validate(custom(function = "check_logged_weight"))]
    pub weight: f64,
    pub mood: Mood,
    pub intensity: Intensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_logged_weight(weight: f64) -> Result<(), ValidationError> {
    validate_weight(weight)
        .map_err(|msg| ValidationError::new("range").with_message(Cow::Owned(msg)))
}

/// Logged entry and whether it reached durable storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogProgressResponse {
    pub entry: ProgressEntry,
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressLogResponse {
    pub entries: Vec<ProgressEntry>,
}
