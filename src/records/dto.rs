use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

/// Body of `POST /records`. Workers may omit `user_id`; admins must set it.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub user_id: Option<i32>,
    pub weight: Decimal,
    /// Defaults to the owner's work type.
    pub work_type: Option<String>,
    pub notes: Option<String>,
    /// Defaults to today in the reporting offset.
    pub record_date: Option<Date>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RecordQuery {
    pub user_id: Option<i32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Debug, Serialize)]
pub struct CreatedRecordResponse {
    pub id: i32,
    pub user_id: i32,
    pub weight: Decimal,
    pub work_type: String,
    pub notes: Option<String>,
    pub record_date: Date,
}
