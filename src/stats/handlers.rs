use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::Date;
use tracing::instrument;

use crate::{
    auth::session::AdminSession,
    stats::{
        repo_types::{GlobalStats, StatsWindow},
        services,
    },
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct DailyStatsResponse {
    pub date: Date,
    #[serde(flatten)]
    pub stats: GlobalStats,
}

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/stats/daily", get(daily_stats))
}

#[instrument(skip(state))]
pub async fn daily_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Json<DailyStatsResponse> {
    let window = StatsWindow::for_day(state.today());
    let stats = services::global_stats(&state.db, &window).await;
    Json(DailyStatsResponse {
        date: window.today,
        stats,
    })
}
