pub mod analysis;
pub mod notifications;
pub mod nutrition;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(nutrition::nutrition_routes())
        .merge(analysis::analysis_routes())
        .merge(notifications::notification_routes())
}
