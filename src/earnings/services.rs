use sqlx::PgPool;
use tracing::debug;

use crate::{
    earnings::{
        repo,
        repo_types::{EarningsReport, EarningsTotals, PriceTable, UserEarnings},
    },
    error::AppError,
    settings,
    stats::repo_types::StatsWindow,
};

pub async fn price_table(db: &PgPool) -> Result<PriceTable, AppError> {
    let rows = settings::repo::list_settings(db).await?;
    Ok(PriceTable::from_settings(&rows))
}

pub async fn user_earnings(
    db: &PgPool,
    window: &StatsWindow,
    user_id: i32,
) -> Result<UserEarnings, AppError> {
    let prices = price_table(db).await?;
    let weights = repo::user_weights(db, window, Some(user_id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(UserEarnings::price(weights, &prices))
}

pub async fn all_earnings(db: &PgPool, window: &StatsWindow) -> Result<EarningsReport, AppError> {
    let prices = price_table(db).await?;
    let users: Vec<UserEarnings> = repo::user_weights(db, window, None)
        .await?
        .into_iter()
        .map(|w| UserEarnings::price(w, &prices))
        .collect();
    let by_type = repo::work_type_weights(db, window).await?;
    let totals = EarningsTotals::from_work_types(&by_type, &prices);
    debug!(users = users.len(), work_types = by_type.len(), "earnings computed");
    Ok(EarningsReport {
        date: window.today,
        prices,
        users,
        totals,
    })
}
