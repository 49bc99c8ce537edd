//! Plan generation API routes

use super::extract::OptionalJson;
use crate::error::ApiError;
use crate::services::audio_data_uri;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use fit_ai_shared::types::{PlanRequest, PlanResponse};

/// Create plan routes
pub fn plan_routes() -> Router<AppState> {
    Router::new().route("/", post(generate_plan))
}

/// POST /api/v1/plan - Generate a plan for the current profile and narrate its summary
///
/// The body is optional; `{"lang": "fr"}` selects the narration language.
/// A body that is present but malformed is rejected.
async fn generate_plan(
    State(state): State<AppState>,
    OptionalJson(body): OptionalJson<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let profile = state.require_profile().await?;
    let lang = state.narration_lang(body.and_then(|req| req.lang));

    let result = state.plans.generate_plan(&profile, &lang).await?;

    Ok(Json(PlanResponse {
        plan: result.full_plan_text,
        narration_audio: audio_data_uri(&result.narration_audio),
    }))
}
