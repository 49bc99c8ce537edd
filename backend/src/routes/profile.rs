//! Profile API routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use fit_ai_shared::types::ProfileResponse;
use fit_ai_shared::validate_profile_input;
use tracing::info;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_profile).get(get_profile))
}

/// POST /api/v1/profile - Validate and store the user's profile
///
/// The body is read leniently so that missing or mistyped fields are
/// reported alongside every other violated constraint. On success the
/// previous profile is replaced.
async fn submit_profile(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<serde_json::Value>, ApiError>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = validate_profile_input(&input).map_err(|e| {
        info!(fields = ?e.fields(), "Profile rejected");
        e
    })?;

    let response = ProfileResponse::from(&profile);
    state.session.lock().await.set_profile(profile);
    Ok(Json(response))
}

/// GET /api/v1/profile - Current profile
async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    let session = state.session.lock().await;
    session
        .profile()
        .map(|p| Json(ProfileResponse::from(p)))
        .ok_or_else(|| ApiError::NotFound("No profile has been submitted".to_string()))
}
