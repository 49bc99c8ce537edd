//! Route definitions for the Fit AI API
//!
//! This module organizes all API routes and applies middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    error_handling::HandleErrorLayer,
    http::{header, Method},
    routing::get,
    BoxError, Router,
};
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

mod equipment;
mod extract;
mod health;
mod plan;
mod profile;
mod progress;
mod workouts;

pub use equipment::equipment_routes;
pub use plan::plan_routes;
pub use profile::profile_routes;
pub use progress::progress_routes;
pub use workouts::workout_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config().server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", api_routes(&state))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(request_timeout),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn middleware failures into the JSON error envelope
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(anyhow::anyhow!(err.to_string()))
    }
}

/// API v1 routes
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Fit AI Coach API v1" }))
        .nest("/profile", profile::profile_routes())
        .nest("/plan", plan::plan_routes())
        .nest("/equipment", equipment::equipment_routes(state.config().upload.max_image_bytes))
        .nest("/workouts", workouts::workout_routes())
        .nest("/progress", progress::progress_routes())
}
