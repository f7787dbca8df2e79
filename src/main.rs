mod adjustments;
mod app;
mod auth;
mod checkins;
mod coach;
mod config;
mod db;
mod error;
mod macro_targets;
#[cfg(test)]
mod memory;
mod onboarding;
mod overrides;
mod plans;
mod profiles;
mod state;
mod storage;
mod versioning;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "coachplan=debug,axum=info,tower_http=info".to_string());
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

    let state = state::AppState::init().await?;
    tracing::info!(
        window_days = state.config.cadence.window.whole_days(),
        grace_hours = state.config.cadence.grace.whole_hours(),
        "check-in cadence"
    );

    app::serve(app::build_app(state)).await
}
