use sqlx::PgPool;
use time::{Date, Duration};

use crate::{
    error::AppError,
    reports::{repo, repo_types::ProductionReport},
};

pub const DEFAULT_DAYS: u16 = 30;
pub const MAX_DAYS: u16 = 366;

/// First date of a trailing window of `days` calendar days ending today
/// (today included, no upper bound).
pub fn report_since(today: Date, days: Option<u16>) -> Result<(u16, Date), AppError> {
    let days = days.unwrap_or(DEFAULT_DAYS);
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(AppError::validation(format!(
            "days must be between 1 and {}",
            MAX_DAYS
        )));
    }
    Ok((days, today - Duration::days(i64::from(days) - 1)))
}

pub async fn production_report(
    db: &PgPool,
    today: Date,
    days: Option<u16>,
) -> Result<ProductionReport, AppError> {
    let (days, since) = report_since(today, days)?;
    Ok(ProductionReport {
        days,
        since,
        by_work_type: repo::totals_by_work_type(db, since).await?,
        daily: repo::daily_totals(db, since).await?,
        top_workers: repo::top_workers(db, since).await?,
    })
}
