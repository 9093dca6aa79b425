use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User};

const USER_COLUMNS: &str = r#"
    id, cpf, password, first_name, last_name, email, profile_image_url,
    COALESCE(is_admin, FALSE) AS is_admin, work_type,
    COALESCE(is_active, TRUE) AS is_active, created_at
"#;

/// Find a user by CPF, active or not.
pub async fn find_by_cpf(db: &PgPool, cpf: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE cpf = $1"))
        .bind(cpf)
        .fetch_optional(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(db: &PgPool, new: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (cpf, password, first_name, last_name, email, profile_image_url, is_admin, work_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&new.cpf)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(&new.profile_image_url)
    .bind(new.is_admin)
    .bind(new.work_type.as_str())
    .fetch_one(db)
    .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY first_name, last_name"
    ))
    .fetch_all(db)
    .await
}

pub async fn list_active(db: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE is_active IS NOT FALSE ORDER BY first_name, last_name"
    ))
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
}

/// True when the error is the `users.cpf` UNIQUE constraint firing.
pub fn is_duplicate_cpf(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
