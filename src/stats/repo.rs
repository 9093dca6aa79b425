use sqlx::PgPool;

use crate::stats::repo_types::{GlobalStats, StatsWindow, UserStats};

// $1 today, $2 month start, $3 next month start, $4 week start.
const TOTALS: &str = r#"
    COALESCE(SUM(weight) FILTER (WHERE record_date = $1), 0) AS today_total,
    COALESCE(SUM(weight) FILTER (WHERE record_date >= $2 AND record_date < $3), 0) AS month_total,
    COALESCE(ROUND(AVG(weight) FILTER (WHERE record_date >= $4), 2), 0) AS weekly_average,
    COALESCE(MAX(weight), 0) AS heaviest_entry
"#;

/// `user_id` of `None` aggregates over every user.
pub async fn user_stats(
    db: &PgPool,
    window: &StatsWindow,
    user_id: Option<i32>,
) -> Result<UserStats, sqlx::Error> {
    sqlx::query_as::<_, UserStats>(&format!(
        "SELECT {TOTALS} FROM weight_records WHERE ($5::INT IS NULL OR user_id = $5)"
    ))
    .bind(window.today)
    .bind(window.month_start)
    .bind(window.next_month_start)
    .bind(window.week_start)
    .bind(user_id)
    .fetch_one(db)
    .await
}

pub async fn global_stats(db: &PgPool, window: &StatsWindow) -> Result<GlobalStats, sqlx::Error> {
    sqlx::query_as::<_, GlobalStats>(&format!(
        r#"
        SELECT {TOTALS},
            COUNT(DISTINCT user_id) FILTER (WHERE record_date = $1) AS active_users_today,
            COUNT(*) AS total_records,
            (SELECT COUNT(*) FROM users) AS total_users
        FROM weight_records
        "#
    ))
    .bind(window.today)
    .bind(window.month_start)
    .bind(window.next_month_start)
    .bind(window.week_start)
    .fetch_one(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::date;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn user_without_records_has_zero_stats() {
        let Some(pool) = test_support::test_pool().await else {
            return;
        };
        let worker = test_support::insert_worker(&pool, "Zero").await;
        let window = StatsWindow::for_day(date!(2024 - 01 - 10));
        let stats = user_stats(&pool, &window, Some(worker.id)).await.unwrap();
        assert_eq!(stats, UserStats::zero(false));
    }

    #[tokio::test]
    async fn aggregates_follow_the_window() {
        let Some(pool) = test_support::test_pool().await else {
            return;
        };
        let worker = test_support::insert_worker(&pool, "Ana").await;
        for (weight, day) in [
            ("12.5", date!(2024 - 01 - 10)),
            ("7.25", date!(2024 - 01 - 10)),
            ("3", date!(2024 - 01 - 03)),
            ("20", date!(2024 - 01 - 02)),
            ("40", date!(2023 - 12 - 31)),
        ] {
            test_support::insert_record(&pool, worker.id, dec(weight), day).await;
        }

        let window = StatsWindow::for_day(date!(2024 - 01 - 10));
        let stats = user_stats(&pool, &window, Some(worker.id)).await.unwrap();
        assert_eq!(stats.today_total, dec("19.75"));
        assert_eq!(stats.month_total, dec("42.75"));
        // entries on 01-03 and 01-10 fall in the trailing week
        assert_eq!(stats.weekly_average, dec("7.58"));
        assert_eq!(stats.heaviest_entry, dec("40"));

        let other_day = StatsWindow::for_day(date!(2024 - 01 - 11));
        let stats = user_stats(&pool, &other_day, Some(worker.id)).await.unwrap();
        assert_eq!(stats.today_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn global_stats_count_active_users() {
        let Some(pool) = test_support::test_pool().await else {
            return;
        };
        let a = test_support::insert_worker(&pool, "Ana").await;
        let b = test_support::insert_worker(&pool, "Bia").await;
        let day = date!(2031 - 05 - 20);
        test_support::insert_record(&pool, a.id, dec("1"), day).await;
        test_support::insert_record(&pool, a.id, dec("2"), day).await;
        test_support::insert_record(&pool, b.id, dec("3"), day).await;

        let stats = global_stats(&pool, &StatsWindow::for_day(day)).await.unwrap();
        assert!(stats.active_users_today >= 2);
        assert!(stats.total_records >= 3);
        assert!(stats.total_users >= 2);
        assert!(stats.today_total >= dec("6"));
    }

    #[tokio::test]
    async fn global_totals_match_unscoped_user_stats() {
        let Some(pool) = test_support::test_pool().await else {
            return;
        };
        let worker = test_support::insert_worker(&pool, "Ana").await;
        let day = date!(2037 - 07 - 07);
        test_support::insert_record(&pool, worker.id, dec("4.5"), day).await;

        let window = StatsWindow::for_day(day);
        let global = global_stats(&pool, &window).await.unwrap();
        let everyone = user_stats(&pool, &window, None).await.unwrap();
        assert_eq!(global.today_total, everyone.today_total);
        assert!(global.today_total >= dec("4.5"));
        assert!(global.active_users_today >= 1);
    }
}
