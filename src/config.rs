use anyhow::Context;
use serde::Deserialize;
use time::UtcOffset;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24 * 7;
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Parses `SESSION_TTL_MINUTES`, clamped to between one minute and a year.
pub fn session_ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_MINUTES)
        .clamp(1, MAX_SESSION_TTL_MINUTES)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Administrator ensured at startup so a fresh database is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub cpf: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub work_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
    /// Offset used to decide what "today" is for stats and reports.
    pub report_utc_offset_hours: i8,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET").context("SESSION_SECRET must be set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "pesagem".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "pesagem-dashboard".into()),
            ttl_minutes: session_ttl_minutes(
                std::env::var("SESSION_TTL_MINUTES").ok().as_deref(),
            ),
        };

        let report_utc_offset_hours = std::env::var("REPORT_UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse::<i8>().ok())
            .unwrap_or(-3);
        UtcOffset::from_hms(report_utc_offset_hours, 0, 0)
            .context("REPORT_UTC_OFFSET_HOURS out of range")?;

        let bootstrap_admin = match (
            std::env::var("BOOTSTRAP_ADMIN_CPF"),
            std::env::var("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Ok(cpf), Ok(password)) => Some(BootstrapAdmin {
                cpf,
                password,
                first_name: std::env::var("BOOTSTRAP_ADMIN_FIRST_NAME")
                    .unwrap_or_else(|_| "Admin".into()),
                last_name: std::env::var("BOOTSTRAP_ADMIN_LAST_NAME")
                    .unwrap_or_else(|_| "Pesqueira".into()),
                work_type: std::env::var("BOOTSTRAP_ADMIN_WORK_TYPE")
                    .unwrap_or_else(|_| "Filetagem".into()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            session,
            report_utc_offset_hours,
            bootstrap_admin,
        })
    }

    pub fn report_offset(&self) -> UtcOffset {
        UtcOffset::from_hms(self.report_utc_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC)
    }
}
