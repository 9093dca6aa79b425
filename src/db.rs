use anyhow::Context;
use sqlx::PgPool;
use tracing::{debug, info};

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        cpf VARCHAR(11) UNIQUE NOT NULL,
        password VARCHAR(255),
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        email VARCHAR(255),
        profile_image_url TEXT,
        is_admin BOOLEAN DEFAULT FALSE,
        work_type VARCHAR(50) NOT NULL,
        is_active BOOLEAN DEFAULT TRUE,
        created_at TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const CREATE_WEIGHT_RECORDS: &str = r#"
    CREATE TABLE IF NOT EXISTS weight_records (
        id SERIAL PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        weight DECIMAL(10,2) NOT NULL,
        work_type VARCHAR(50) NOT NULL,
        notes TEXT,
        record_date DATE NOT NULL,
        created_at TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const CREATE_SETTINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS settings (
        id SERIAL PRIMARY KEY,
        key VARCHAR(100) UNIQUE NOT NULL,
        value VARCHAR(255) NOT NULL,
        updated_at TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const SEED_SETTINGS: &str = r#"
    INSERT INTO settings (key, value)
    VALUES ('file_price_per_kg', '12.50'), ('spine_price_per_kg', '8.00')
    ON CONFLICT (key) DO NOTHING
"#;

/// Statements applied in order on every start. Additive only.
pub const SCHEMA: &[(&str, &str)] = &[
    ("users", CREATE_USERS),
    ("weight_records", CREATE_WEIGHT_RECORDS),
    ("settings", CREATE_SETTINGS),
    ("settings seed", SEED_SETTINGS),
];

// duplicate_table / unique_violation on pg_type when two instances race
// through CREATE TABLE IF NOT EXISTS.
fn lost_creation_race(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "42P07" || code == "23505")
        .unwrap_or(false)
}

/// Creates missing tables and default settings. Never drops or alters.
pub async fn ensure_schema(db: &PgPool) -> anyhow::Result<()> {
    for (name, ddl) in SCHEMA {
        match sqlx::query(ddl).execute(db).await {
            Ok(_) => debug!(step = %name, "schema step applied"),
            Err(e) if lost_creation_race(&e) => {
                debug!(step = %name, "schema step applied concurrently")
            }
            Err(e) => return Err(e).with_context(|| format!("ensure schema: {}", name)),
        }
    }
    info!("database schema ready");
    Ok(())
}
