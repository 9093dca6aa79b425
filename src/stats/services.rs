use sqlx::PgPool;
use tracing::error;

use crate::stats::{
    repo,
    repo_types::{GlobalStats, StatsWindow, UserStats},
};

/// Stats for one user, or everyone when `user_id` is `None`.
/// A failed query degrades to zeros instead of failing the caller.
pub async fn user_stats(db: &PgPool, window: &StatsWindow, user_id: Option<i32>) -> UserStats {
    match repo::user_stats(db, window, user_id).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, ?user_id, "user stats query failed; returning zeros");
            UserStats::zero(true)
        }
    }
}

pub async fn global_stats(db: &PgPool, window: &StatsWindow) -> GlobalStats {
    match repo::global_stats(db, window).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "global stats query failed; returning zeros");
            GlobalStats::zero(true)
        }
    }
}
