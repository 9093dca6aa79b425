use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AdminLoginRequest, LoginResponse, WorkerLoginRequest},
        services,
        session::{Session, SessionKeys},
    },
    error::AppError,
    extractors::extract_json,
    state::AppState,
    users::{dto::UserWithStats, handlers::with_stats, repo_types::User},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/admin-login", post(admin_login))
        .route("/auth/worker-login", post(worker_login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

fn issue(state: &AppState, user: User) -> Result<Json<LoginResponse>, AppError> {
    let keys = SessionKeys::from_ref(state);
    let role = user.role();
    let token = keys.sign(user.id, role)?;
    info!(user_id = user.id, role = ?role, "user logged in");
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in_seconds: keys.ttl_seconds(),
        role,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let payload = extract_json(payload)?;
    let user = services::login_admin(&state.db, &payload.cpf, &payload.password).await?;
    issue(&state, user)
}

#[instrument(skip(state, payload))]
pub async fn worker_login(
    State(state): State<AppState>,
    payload: Result<Json<WorkerLoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let payload = extract_json(payload)?;
    let user = services::login_worker(&state.db, &payload.cpf).await?;
    issue(&state, user)
}

/// Tokens are held by the client; logging out just drops it there.
#[instrument]
pub async fn logout(session: Session) -> StatusCode {
    info!(user_id = session.user_id(), "user logged out");
    StatusCode::NO_CONTENT
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserWithStats>, AppError> {
    let found = with_stats(&state, session.user_id()).await;
    match found {
        Err(AppError::NotFound(_)) => Err(AppError::Unauthenticated("User no longer exists")),
        other => other.map(Json),
    }
}
