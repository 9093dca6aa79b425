use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::session::Session,
    error::AppError,
    extractors::{extract_json, extract_query},
    records::{
        dto::{CreateRecordRequest, CreatedRecordResponse, RecordQuery},
        repo,
        repo_types::RecordWithUser,
        services,
    },
    state::AppState,
};

pub fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/records", post(create_record).get(list_records))
        .route("/records/export", get(export_records))
}

#[instrument(skip(state, payload))]
pub async fn create_record(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRecordResponse>), AppError> {
    let payload = extract_json(payload)?;
    let created = services::create_record(&state.db, &session, payload, state.today()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_records(
    State(state): State<AppState>,
    session: Session,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> Result<Json<Vec<RecordWithUser>>, AppError> {
    let query = extract_query(query)?;
    let filter = services::scoped_filter(&session, &query)?;
    let rows = repo::list_records(&state.db, &filter).await?;
    debug!(count = rows.len(), "records listed");
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn export_records(
    State(state): State<AppState>,
    session: Session,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = extract_query(query)?;
    let filter = services::scoped_filter(&session, &query)?;
    let rows = repo::list_records(&state.db, &filter).await?;
    let filename = format!("attachment; filename=\"pesagem-{}.csv\"", state.today());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        services::records_to_csv(&rows),
    ))
}
