//! REST endpoints for driving a consultation.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use super::engine::Event;
use super::manager::{ConsultationManager, Rejection};
use super::session::ConsultationSession;
use crate::error::TransitionError;

/// Shared state for consultation routes.
#[derive(Clone)]
pub struct ConsultationRouteState {
    pub manager: Arc<ConsultationManager>,
}

/// Body returned by `POST /api/consultation/events`.
#[derive(Debug, Serialize)]
struct EventResponse {
    session: ConsultationSession,
    #[serde(skip_serializing_if = "Option::is_none")]
    acknowledgement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// GET /api/consultation/session
async fn get_session(State(state): State<ConsultationRouteState>) -> impl IntoResponse {
    Json(state.manager.snapshot().await)
}

/// GET /api/consultation/scene
///
/// Background, character visibility and legal events for the current step.
async fn get_scene(State(state): State<ConsultationRouteState>) -> impl IntoResponse {
    Json(state.manager.scene().await)
}

/// POST /api/consultation/events
///
/// Applies one event. Rejections still return the (unchanged) session so the
/// client can redraw: 409 for events off the step graph, 422 for answers
/// outside the offered options.
async fn post_event(
    State(state): State<ConsultationRouteState>,
    Json(event): Json<Event>,
) -> impl IntoResponse {
    match state.manager.try_submit(event).await {
        Ok(transition) => (
            StatusCode::OK,
            Json(EventResponse {
                session: transition.session,
                acknowledgement: transition.acknowledgement,
                error: None,
            }),
        ),
        Err(Rejection { error: e, session }) => {
            let status = match e {
                TransitionError::InvalidTransition { .. } => StatusCode::CONFLICT,
                TransitionError::UnrecognizedOption { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (
                status,
                Json(EventResponse {
                    session,
                    acknowledgement: e.acknowledgement().map(str::to_string),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// POST /api/consultation/restart
async fn post_restart(State(state): State<ConsultationRouteState>) -> impl IntoResponse {
    Json(state.manager.restart().await)
}

/// GET /api/consultation/summary
///
/// The receipt, or 404 until the consultation reaches its summary.
async fn get_summary(State(state): State<ConsultationRouteState>) -> impl IntoResponse {
    match state.manager.summary().await {
        Some(summary) => Json(summary).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Consultation is not finished yet"})),
        )
            .into_response(),
    }
}

/// Build the consultation REST routes.
pub fn consultation_routes(state: ConsultationRouteState) -> Router {
    Router::new()
        .route("/api/consultation/session", get(get_session))
        .route("/api/consultation/scene", get(get_scene))
        .route("/api/consultation/events", post(post_event))
        .route("/api/consultation/restart", post(post_restart))
        .route("/api/consultation/summary", get(get_summary))
        .with_state(state)
}
