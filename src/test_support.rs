//! Helpers shared by unit tests.
//!
//! Database-backed tests connect to `TEST_DATABASE_URL` and return early when
//! it is unset, so the suite stays green on machines without PostgreSQL.

use axum::extract::FromRef;
use rand::Rng;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::{macros::datetime, Date};

use crate::{
    auth::session::{Role, SessionKeys},
    db::ensure_schema,
    records::{repo as records_repo, repo_types::NewRecord},
    state::AppState,
    users::{
        repo as users_repo,
        repo_types::{NewUser, User, WorkType},
    },
};

pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("TEST_DATABASE_URL is set but unreachable");
    ensure_schema(&pool).await.expect("ensure schema");
    Some(pool)
}

/// Random 11-digit CPF so tests sharing a database never collide.
pub fn unique_cpf() -> String {
    let mut rng = rand::thread_rng();
    (0..11)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn user(id: i32, cpf: &str, is_admin: bool, password: Option<String>) -> User {
    User {
        id,
        cpf: cpf.to_string(),
        password,
        first_name: "Ana".into(),
        last_name: "Silva".into(),
        email: None,
        profile_image_url: None,
        is_admin,
        work_type: "Filetagem".into(),
        is_active: true,
        created_at: datetime!(2024-01-01 08:00 UTC),
    }
}

pub async fn insert_worker(db: &PgPool, first_name: &str) -> User {
    users_repo::create(
        db,
        &NewUser {
            cpf: unique_cpf(),
            password_hash: None,
            first_name: first_name.into(),
            last_name: "Silva".into(),
            email: None,
            profile_image_url: None,
            is_admin: false,
            work_type: WorkType::Filetagem,
        },
    )
    .await
    .expect("insert worker")
}

pub async fn insert_record(db: &PgPool, user_id: i32, weight: Decimal, date: Date) -> i32 {
    records_repo::create_record(
        db,
        &NewRecord {
            user_id,
            weight,
            work_type: WorkType::Filetagem,
            notes: None,
            record_date: date,
        },
    )
    .await
    .expect("insert record")
}

pub fn bearer(state: &AppState, user_id: i32, role: Role) -> String {
    let token = SessionKeys::from_ref(state)
        .sign(user_id, role)
        .expect("sign session");
    format!("Bearer {}", token)
}
