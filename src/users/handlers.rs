use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    auth::session::{AdminSession, Session},
    error::AppError,
    extractors::{extract_json, extract_path, extract_query},
    stats::{self, repo_types::StatsWindow},
    state::AppState,
    users::{
        dto::{CreateUserRequest, UserWithStats},
        repo,
        repo_types::User,
        services,
    },
};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    #[serde(default)]
    pub active: bool,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id/stats", get(user_stats))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminSession,
    query: Result<Query<UserListQuery>, QueryRejection>,
) -> Result<Json<Vec<User>>, AppError> {
    let query = extract_query(query)?;
    let users = if query.active {
        repo::list_active(&state.db).await?
    } else {
        repo::list_all(&state.db).await?
    };
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let payload = extract_json(payload)?;
    let valid = services::validate_new_user(payload)?;
    let user = services::create_user(&state.db, valid).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Loads a user and attaches today's stats.
pub async fn with_stats(state: &AppState, user_id: i32) -> Result<UserWithStats, AppError> {
    let user = repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    let window = StatsWindow::for_day(state.today());
    let stats = stats::services::user_stats(&state.db, &window, Some(user.id)).await;
    Ok(UserWithStats { user, stats })
}

#[instrument(skip(state))]
pub async fn user_stats(
    State(state): State<AppState>,
    session: Session,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<UserWithStats>, AppError> {
    let user_id = session.inspect_user(extract_path(id)?)?;
    Ok(Json(with_stats(&state, user_id).await?))
}
