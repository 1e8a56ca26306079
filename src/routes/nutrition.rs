use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{nutrition::NutritionSummary, state::AppState};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new().route("/nutrition", get(get_nutrition))
}

/// Totals over every logged meal, against the configured daily goals.
#[instrument(skip(state))]
pub async fn get_nutrition(State(state): State<AppState>) -> Json<NutritionSummary> {
    Json(NutritionSummary::new(
        state.tracker.totals(),
        state.config.goals,
    ))
}
