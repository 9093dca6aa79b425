mod app;
mod auth;
mod config;
mod db;
mod earnings;
mod error;
mod extractors;
mod records;
mod reports;
mod settings;
mod state;
mod stats;
#[cfg(test)]
mod test_support;
mod users;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "pesagem=debug,axum=info,tower_http=info".to_string());
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

    let app_state = state::AppState::init().await?;

    db::ensure_schema(&app_state.db)
        .await
        .context("prepare database schema")?;

    match &app_state.config.bootstrap_admin {
        Some(admin) => users::services::ensure_bootstrap_admin(&app_state.db, admin).await?,
        None => {
            if users::repo::count(&app_state.db).await? == 0 {
                tracing::warn!("no users yet; set BOOTSTRAP_ADMIN_CPF and BOOTSTRAP_ADMIN_PASSWORD");
            }
        }
    }

    let config = app_state.config.clone();
    let app = app::build_app(app_state);
    app::serve(app, &config).await
}
