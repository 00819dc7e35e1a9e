// HTTP request handlers
use crate::domain::selection::{ManualSubmit, SelectionError};
use crate::presentation::app_state::AppState;
use crate::presentation::stream::status_sse;
use crate::presentation::view::{
    ChartView, ManualTargetRequest, ManualTargetResponse, ProfilesView, SelectionRequest, StartResponse,
    StatusView,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusView> {
    let view = state.console.view().await;
    Json(StatusView::from(&view))
}

/// Samples in the current window plus axis hints for the chart
pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartView> {
    Json(ChartView::from(state.console.chart().await))
}

pub async fn list_profiles(State(state): State<Arc<AppState>>) -> Json<ProfilesView> {
    Json(ProfilesView::from(state.console.profiles().await))
}

pub async fn update_selection(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    let result = match request {
        SelectionRequest::Profile { index } => state.console.select_profile(index).await,
        SelectionRequest::Manual => Ok(state.console.select_manual().await),
    };

    match result {
        Ok(_) => {
            let view = state.console.view().await;
            Json(StatusView::from(&view)).into_response()
        }
        Err(e @ SelectionError::UnknownProfile { .. }) => {
            tracing::debug!("Rejected selection: {}", e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
    }
}

pub async fn submit_manual_target(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ManualTargetRequest>,
) -> Json<ManualTargetResponse> {
    let outcome = state.console.submit_manual_target(&request.input).await;
    let manual_target = state.console.view().await.manual_target;

    let (accepted, retargeted) = match outcome {
        ManualSubmit::Accepted { retarget, .. } => (true, retarget.is_some()),
        ManualSubmit::Rejected | ManualSubmit::Ignored => (false, false),
    };

    Json(ManualTargetResponse {
        accepted,
        manual_target,
        retargeted,
    })
}

pub async fn start(State(state): State<Arc<AppState>>) -> Response {
    match state.console.start().await {
        Some(command) => (StatusCode::ACCEPTED, Json(StartResponse::from(command))).into_response(),
        None => (
            StatusCode::CONFLICT,
            "start is disabled: select a profile or manual mode, and wait for the oven to stop",
        )
            .into_response(),
    }
}

pub async fn stop(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.console.stop().await {
        StatusCode::ACCEPTED
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Live status updates as server-sent events
pub async fn stream_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    status_sse(state.console.subscribe())
}
