use sqlx::PgPool;

use crate::{
    earnings::repo_types::{UserWeights, WorkTypeWeights},
    stats::repo_types::StatsWindow,
};

/// With `user_id` set, that user (active or not); otherwise every active user.
pub async fn user_weights(
    db: &PgPool,
    window: &StatsWindow,
    user_id: Option<i32>,
) -> Result<Vec<UserWeights>, sqlx::Error> {
    sqlx::query_as::<_, UserWeights>(
        r#"
        SELECT u.id AS user_id, u.first_name, u.last_name, u.work_type,
            COALESCE(SUM(r.weight) FILTER (WHERE r.record_date = $1), 0) AS today_weight,
            COALESCE(SUM(r.weight) FILTER (WHERE r.record_date >= $2 AND r.record_date < $3), 0) AS month_weight
        FROM users u
        LEFT JOIN weight_records r ON r.user_id = u.id
        WHERE ($4::INT IS NULL AND u.is_active IS NOT FALSE) OR u.id = $4
        GROUP BY u.id
        ORDER BY u.first_name, u.last_name
        "#,
    )
    .bind(window.today)
    .bind(window.month_start)
    .bind(window.next_month_start)
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn work_type_weights(
    db: &PgPool,
    window: &StatsWindow,
) -> Result<Vec<WorkTypeWeights>, sqlx::Error> {
    sqlx::query_as::<_, WorkTypeWeights>(
        r#"
        SELECT work_type,
            COALESCE(SUM(weight) FILTER (WHERE record_date = $1), 0) AS today_weight,
            COALESCE(SUM(weight), 0) AS month_weight
        FROM weight_records
        WHERE record_date >= $2 AND record_date < $3
        GROUP BY work_type
        ORDER BY work_type
        "#,
    )
    .bind(window.today)
    .bind(window.month_start)
    .bind(window.next_month_start)
    .fetch_all(db)
    .await
}
