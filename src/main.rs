mod analysis;
mod app;
mod config;
mod error;
mod images;
mod meals;
mod notifications;
mod nutrition;
mod routes;
mod state;
mod storage;
mod tracker;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "mealmind=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init()?;
    tracing::info!(
        meals = state.tracker.meals().len(),
        analysis_timeout_secs = state.config.analysis.timeout_secs,
        "meal log ready"
    );

    let addr = state.config.bind_addr();
    let app = app::build_app(state);
    app::serve(app, &addr).await
}
