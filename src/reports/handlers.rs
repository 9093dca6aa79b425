use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    auth::session::AdminSession,
    error::AppError,
    extractors::extract_query,
    reports::{repo_types::ProductionReport, services},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub days: Option<u16>,
}

pub fn report_routes() -> Router<AppState> {
    Router::new().route("/reports/production", get(production_report))
}

#[instrument(skip(state))]
pub async fn production_report(
    State(state): State<AppState>,
    _admin: AdminSession,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ProductionReport>, AppError> {
    let query = extract_query(query)?;
    let report = services::production_report(&state.db, state.today(), query.days).await?;
    Ok(Json(report))
}
