use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkTypeTotal {
    pub work_type: String,
    pub total_weight: Decimal,
    pub record_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailyTotal {
    pub record_date: Date,
    pub work_type: String,
    pub total_weight: Decimal,
    pub record_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkerTotal {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub work_type: String,
    pub total_weight: Decimal,
    pub record_count: i64,
}

/// Production over a trailing window of days.
#[derive(Debug, Serialize)]
pub struct ProductionReport {
    pub days: u16,
    pub since: Date,
    pub by_work_type: Vec<WorkTypeTotal>,
    pub daily: Vec<DailyTotal>,
    pub top_workers: Vec<WorkerTotal>,
}
