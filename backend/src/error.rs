//! Application error handling
//!
//! Converts domain errors into HTTP responses with a uniform JSON envelope.

use crate::services::EquipmentError;
use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fit_ai_shared::types::{ErrorDetail, ErrorResponse};
use fit_ai_shared::{InvalidInputError, ProfileValidationError, ServiceError, StorageError};
use thiserror::Error;
use tracing::{debug, error};

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    ProfileValidation(#[from] ProfileValidationError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("A profile is required: {0}")]
    ProfileRequired(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<EquipmentError> for ApiError {
    fn from(err: EquipmentError) -> Self {
        match err {
            EquipmentError::InvalidInput(e) => ApiError::InvalidInput(e),
            EquipmentError::Service(e) => ApiError::Service(e),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // The rejection text quotes serde internals; keep it out of responses
        debug!(rejection = %rejection.body_text(), "Request body rejected");
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::InvalidBody(
                "Request body has missing or mistyped fields".to_string(),
            ),
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::BadRequest("Request body is not valid JSON".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("Expected a JSON request body".to_string())
            }
            _ => ApiError::BadRequest("Request body could not be read".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut field = None;
        let mut details = None;

        let (status, code, message) = match &self {
            ApiError::ProfileValidation(err) => {
                field = err.errors.first().map(|e| e.field.clone());
                details = serde_json::to_value(&err.errors).ok();
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", err.to_string())
            }
            ApiError::Validation(errs) => {
                field = errs.field_errors().keys().next().map(|k| k.to_string());
                details = serde_json::to_value(errs).ok();
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", self.to_string())
            }
            ApiError::InvalidInput(err) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::InvalidBody(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_BODY", msg.clone())
            }
            ApiError::Service(err) => {
                details = Some(serde_json::json!({ "stage": err.stage }));
                (StatusCode::BAD_GATEWAY, "SERVICE_ERROR", err.to_string())
            }
            ApiError::ProfileRequired(msg) => (StatusCode::CONFLICT, "PROFILE_REQUIRED", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "The request did not finish in time; please try again".to_string(),
            ),
            ApiError::Storage(err) => {
                error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Progress could not be saved".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
                details,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
