//! Equipment photo upload routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use fit_ai_shared::types::EquipmentPlanResponse;
use fit_ai_shared::WorkoutHistoryEntry;
use tracing::debug;

/// Multipart framing on top of the largest accepted image
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create equipment routes
pub fn equipment_routes(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_equipment))
        .layer(DefaultBodyLimit::max(max_image_bytes + MULTIPART_OVERHEAD_BYTES))
}

/// POST /api/v1/equipment - Plan a workout around a photo of available equipment
///
/// Expects a multipart form with the photo in the `image` field.
async fn upload_equipment(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EquipmentPlanResponse>, ApiError> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            debug!(file_name = ?field.file_name(), content_type = ?field.content_type(), "Received image");
            image = Some(field.bytes().await?);
            break;
        }
    }
    let image = image.ok_or_else(|| ApiError::BadRequest("Missing `image` form field".to_string()))?;

    let profile = state.require_profile().await?;
    let result = state.equipment.generate_equipment_plan(&profile, &image).await?;

    // Only completed analyses enter the history
    state
        .session
        .lock()
        .await
        .append_workout_history(WorkoutHistoryEntry::completed_today(&result));

    Ok(Json(EquipmentPlanResponse {
        equipment: result.equipment_description,
        plan: result.plan_text,
    }))
}
