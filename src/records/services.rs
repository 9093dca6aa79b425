use rust_decimal::Decimal;
use sqlx::PgPool;
use time::Date;
use tracing::{info, warn};

use crate::{
    auth::session::Session,
    error::AppError,
    records::{
        dto::{CreateRecordRequest, CreatedRecordResponse, RecordQuery},
        repo,
        repo_types::{NewRecord, RecordFilter, RecordWithUser},
    },
    users::{self, repo_types::WorkType},
};

pub const CSV_HEADER: &str = "Date,Worker,CPF,Weight,Work type,Notes";

/// Largest weight a DECIMAL(10,2) column holds is just under 10^8.
fn max_weight() -> Decimal {
    Decimal::from(100_000_000u32)
}

pub fn validate_weight(weight: Decimal) -> Result<Decimal, AppError> {
    let weight = weight.round_dp(2);
    if weight <= Decimal::ZERO {
        return Err(AppError::validation("Weight must be greater than zero"));
    }
    if weight >= max_weight() {
        return Err(AppError::validation("Weight is too large"));
    }
    Ok(weight)
}

/// Resolves what the session may see and checks the date range.
pub fn scoped_filter(session: &Session, query: &RecordQuery) -> Result<RecordFilter, AppError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::validation("start_date must not be after end_date"));
        }
    }
    Ok(RecordFilter {
        user_id: session.readable_user(query.user_id)?,
        start_date: query.start_date,
        end_date: query.end_date,
    })
}

pub async fn create_record(
    db: &PgPool,
    session: &Session,
    req: CreateRecordRequest,
    today: Date,
) -> Result<CreatedRecordResponse, AppError> {
    let user_id = session.record_owner(req.user_id)?;
    let weight = validate_weight(req.weight)?;

    let owner = users::repo::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    if !owner.is_active {
        warn!(user_id, "record for inactive user refused");
        return Err(AppError::validation("User is inactive"));
    }

    let work_type: WorkType = req
        .work_type
        .as_deref()
        .unwrap_or(&owner.work_type)
        .parse()
        .map_err(AppError::Validation)?;

    let new = NewRecord {
        user_id,
        weight,
        work_type,
        notes: req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        record_date: req.record_date.unwrap_or(today),
    };
    let id = repo::create_record(db, &new).await?;
    info!(record_id = id, user_id, by = session.user_id(), "weight record created");

    Ok(CreatedRecordResponse {
        id,
        user_id,
        weight: new.weight,
        work_type: new.work_type.to_string(),
        notes: new.notes,
        record_date: new.record_date,
    })
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_date(date: Date) -> String {
    format!("{:02}/{:02}/{}", date.day(), u8::from(date.month()), date.year())
}

/// Renders records as CSV, one line per record after the header.
pub fn records_to_csv(rows: &[RecordWithUser]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let worker = format!("{} {}", row.first_name, row.last_name);
        let fields = [
            csv_date(row.record_date),
            csv_field(&worker),
            csv_field(&row.cpf),
            row.weight.to_string(),
            csv_field(&row.work_type),
            csv_field(row.notes.as_deref().unwrap_or("")),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
