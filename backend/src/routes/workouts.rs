//! Workout routine and history routes

use super::extract::OptionalJson;
use crate::error::ApiError;
use crate::services::{audio_data_uri, WorkoutService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use fit_ai_shared::types::{
    NarrationRequest, NarrationResponse, WorkoutHistoryResponse, WorkoutTodayResponse,
};

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today))
        .route("/today/:index/narration", post(narrate_exercise))
        .route("/history", get(get_history))
}

/// GET /api/v1/workouts/today - Today's routine
async fn get_today() -> Json<WorkoutTodayResponse> {
    Json(WorkoutTodayResponse {
        exercises: WorkoutService::today(),
    })
}

/// POST /api/v1/workouts/today/:index/narration - Spoken instructions for one exercise
async fn narrate_exercise(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    OptionalJson(body): OptionalJson<NarrationRequest>,
) -> Result<Json<NarrationResponse>, ApiError> {
    let card = WorkoutService::card(index)
        .ok_or_else(|| ApiError::NotFound(format!("No exercise at position {}", index)))?;
    let lang = state.narration_lang(body.and_then(|req| req.lang));

    let narration = WorkoutService::narrate(state.synthesizer.as_ref(), &card, &lang).await?;

    Ok(Json(NarrationResponse {
        text: narration.text,
        audio: audio_data_uri(&narration.audio),
    }))
}

/// GET /api/v1/workouts/history - Equipment plans generated this session
async fn get_history(State(state): State<AppState>) -> Json<WorkoutHistoryResponse> {
    let session = state.session.lock().await;
    Json(WorkoutHistoryResponse {
        entries: session.workout_history().to_vec(),
    })
}
