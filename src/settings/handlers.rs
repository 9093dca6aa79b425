use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    auth::session::AdminSession,
    error::AppError,
    extractors::extract_json,
    settings::{repo, repo_types::Setting, services},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(list_settings))
        .route("/settings/:key", get(get_setting).put(update_setting))
}

#[instrument(skip(state))]
pub async fn list_settings(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Setting>>, AppError> {
    Ok(Json(repo::list_settings(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_setting(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
) -> Result<Json<Setting>, AppError> {
    repo::get_setting(&state.db, &key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Setting {} not found", key)))
}

#[instrument(skip(state, payload))]
pub async fn update_setting(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(key): Path<String>,
    payload: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<Json<Setting>, AppError> {
    let payload = extract_json(payload)?;
    let setting = services::update_setting(&state.db, &key, &payload.value, admin.user_id).await?;
    Ok(Json(setting))
}
