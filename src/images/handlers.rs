use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{error, instrument};

use crate::state::AppState;

pub fn image_routes() -> Router<AppState> {
    Router::new().route("/images/*key", get(get_image))
}

/// Raw bytes of a stored meal photo.
#[instrument(skip(state))]
pub async fn get_image(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.tracker.storage().get_object(&key).await {
        Ok(Some(obj)) => ([(header::CONTENT_TYPE, obj.content_type)], obj.body).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Image not found").into_response(),
        Err(e) => {
            error!(error = %e, %key, "get_object failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
        }
    }
}
