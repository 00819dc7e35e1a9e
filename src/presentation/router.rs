// Console routes
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_status, health_check, list_profiles, start, stop, stream_status, submit_manual_target,
    update_selection,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/console", get(get_status))
        .route("/console/chart", get(get_chart))
        .route("/console/profiles", get(list_profiles))
        .route("/console/selection", post(update_selection))
        .route("/console/manual-target", post(submit_manual_target))
        .route("/console/start", post(start))
        .route("/console/stop", post(stop))
        .route("/console/stream", get(stream_status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
