use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{notifications::Notification, state::AppState};

pub fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(list_notifications).delete(clear_notifications),
    )
}

/// Oldest first.
pub async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.tracker.notifications())
}

#[instrument(skip(state))]
pub async fn clear_notifications(State(state): State<AppState>) -> StatusCode {
    state.tracker.clear_notifications();
    debug!("notifications cleared");
    StatusCode::NO_CONTENT
}
