//! Progress tracking API routes

use crate::error::ApiError;
use crate::services::ExportService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use fit_ai_shared::types::{LogProgressRequest, LogProgressResponse, ProgressLogResponse};
use fit_ai_shared::{summarize_progress, ProgressAnalytics, ProgressEntry};
use tracing::warn;
use validator::Validate;

/// Create progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_progress).get(get_progress))
        .route("/analytics", get(get_analytics))
        .route("/export.csv", get(export_csv))
}

/// POST /api/v1/progress - Log today's check-in
///
/// The entry is kept for the session even if writing the progress file
/// fails; `persisted` tells the client which happened.
async fn log_progress(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LogProgressRequest>, ApiError>,
) -> Result<(StatusCode, Json<LogProgressResponse>), ApiError> {
    req.validate()?;

    let entry = ProgressEntry::new(req.weight, req.mood, req.intensity, req.notes);

    let persisted = match state.session.lock().await.append_progress(entry.clone()).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Progress entry kept in memory only");
            false
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(LogProgressResponse { entry, persisted }),
    ))
}

/// GET /api/v1/progress - Full progress log in insertion order
async fn get_progress(State(state): State<AppState>) -> Json<ProgressLogResponse> {
    let session = state.session.lock().await;
    Json(ProgressLogResponse {
        entries: session.progress().to_vec(),
    })
}

/// GET /api/v1/progress/analytics - Chart-ready progress summary
async fn get_analytics(State(state): State<AppState>) -> Json<ProgressAnalytics> {
    let session = state.session.lock().await;
    Json(summarize_progress(session.progress()))
}

/// GET /api/v1/progress/export.csv - Download the progress report
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let csv = {
        let session = state.session.lock().await;
        ExportService::export_progress_csv(session.progress())?
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"progress-report.csv\""),
    );

    Ok((headers, csv))
}
