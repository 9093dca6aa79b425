use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::session::{AdminSession, Session},
    earnings::{
        repo_types::{EarningsReport, UserEarnings},
        services,
    },
    error::AppError,
    extractors::extract_path,
    state::AppState,
    stats::repo_types::StatsWindow,
};

pub fn earnings_routes() -> Router<AppState> {
    Router::new()
        .route("/earnings", get(all_earnings))
        .route("/earnings/:user_id", get(user_earnings))
}

#[instrument(skip(state))]
pub async fn all_earnings(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<EarningsReport>, AppError> {
    let window = StatsWindow::for_day(state.today());
    Ok(Json(services::all_earnings(&state.db, &window).await?))
}

#[instrument(skip(state))]
pub async fn user_earnings(
    State(state): State<AppState>,
    session: Session,
    user_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserEarnings>, AppError> {
    let user_id = session.inspect_user(extract_path(user_id)?)?;
    let window = StatsWindow::for_day(state.today());
    Ok(Json(services::user_earnings(&state.db, &window, user_id).await?))
}
