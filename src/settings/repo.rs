use sqlx::PgPool;

use crate::settings::repo_types::Setting;

pub async fn list_settings(db: &PgPool) -> Result<Vec<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT id, key, value, updated_at FROM settings ORDER BY key")
        .fetch_all(db)
        .await
}

pub async fn get_setting(db: &PgPool, key: &str) -> Result<Option<Setting>, sqlx::Error> {
    sqlx::query_as::<_, Setting>("SELECT id, key, value, updated_at FROM settings WHERE key = $1")
        .bind(key)
        .fetch_optional(db)
        .await
}

/// Insert or overwrite, bumping `updated_at`.
pub async fn set_setting(db: &PgPool, key: &str, value: &str) -> Result<Setting, sqlx::Error> {
    sqlx::query_as::<_, Setting>(
        r#"
        INSERT INTO settings (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        RETURNING id, key, value, updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .fetch_one(db)
    .await
}
