use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::users::repo_types::WorkType;

/// Validated input for a weight record insert.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: i32,
    pub weight: Decimal,
    pub work_type: WorkType,
    pub notes: Option<String>,
    pub record_date: Date,
}

/// Optional, AND-combined filters. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFilter {
    pub user_id: Option<i32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// A weight record joined with its owner's identity.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecordWithUser {
    pub id: i32,
    pub user_id: i32,
    pub weight: Decimal,
    pub work_type: String,
    pub notes: Option<String>,
    pub record_date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
}
