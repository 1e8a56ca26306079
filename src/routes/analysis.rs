use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{state::AppState, tracker::PipelineState};

#[derive(Debug, Serialize)]
pub struct AnalysisStatus {
    pub state: PipelineState,
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/analysis", get(get_analysis_status))
}

pub async fn get_analysis_status(State(state): State<AppState>) -> Json<AnalysisStatus> {
    Json(AnalysisStatus {
        state: state.tracker.state(),
    })
}
