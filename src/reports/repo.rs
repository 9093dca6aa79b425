use sqlx::PgPool;
use time::Date;

use crate::reports::repo_types::{DailyTotal, WorkTypeTotal, WorkerTotal};

pub const TOP_WORKERS: i64 = 10;

pub async fn totals_by_work_type(
    db: &PgPool,
    since: Date,
) -> Result<Vec<WorkTypeTotal>, sqlx::Error> {
    sqlx::query_as::<_, WorkTypeTotal>(
        r#"
        SELECT work_type, SUM(weight) AS total_weight, COUNT(*) AS record_count
        FROM weight_records
        WHERE record_date >= $1
        GROUP BY work_type
        ORDER BY total_weight DESC, work_type
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await
}

pub async fn daily_totals(db: &PgPool, since: Date) -> Result<Vec<DailyTotal>, sqlx::Error> {
    sqlx::query_as::<_, DailyTotal>(
        r#"
        SELECT record_date, work_type, SUM(weight) AS total_weight, COUNT(*) AS record_count
        FROM weight_records
        WHERE record_date >= $1
        GROUP BY record_date, work_type
        ORDER BY record_date ASC, work_type
        "#,
    )
    .bind(since)
    .fetch_all(db)
    .await
}

pub async fn top_workers(db: &PgPool, since: Date) -> Result<Vec<WorkerTotal>, sqlx::Error> {
    sqlx::query_as::<_, WorkerTotal>(
        r#"
        SELECT u.id AS user_id, u.first_name, u.last_name, u.work_type,
               SUM(r.weight) AS total_weight, COUNT(r.id) AS record_count
        FROM weight_records r
        JOIN users u ON u.id = r.user_id
        WHERE r.record_date >= $1
        GROUP BY u.id
        ORDER BY total_weight DESC, u.id
        LIMIT $2
        "#,
    )
    .bind(since)
    .bind(TOP_WORKERS)
    .fetch_all(db)
    .await
}
