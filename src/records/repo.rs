use sqlx::PgPool;

use crate::records::repo_types::{NewRecord, RecordFilter, RecordWithUser};

/// Inserts one record and returns its id. Autocommits.
pub async fn create_record(db: &PgPool, new: &NewRecord) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO weight_records (user_id, weight, work_type, notes, record_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(new.user_id)
    .bind(new.weight)
    .bind(new.work_type.as_str())
    .bind(&new.notes)
    .bind(new.record_date)
    .fetch_one(db)
    .await
}

/// Newest record date first; ties broken by newest id.
pub async fn list_records(
    db: &PgPool,
    filter: &RecordFilter,
) -> Result<Vec<RecordWithUser>, sqlx::Error> {
    sqlx::query_as::<_, RecordWithUser>(
        r#"
        SELECT r.id, r.user_id, r.weight, r.work_type, r.notes, r.record_date, r.created_at,
               u.first_name, u.last_name, u.cpf
        FROM weight_records r
        JOIN users u ON u.id = r.user_id
        WHERE ($1::INT IS NULL OR r.user_id = $1)
          AND ($2::DATE IS NULL OR r.record_date >= $2)
          AND ($3::DATE IS NULL OR r.record_date <= $3)
        ORDER BY r.record_date DESC, r.id DESC
        "#,
    )
    .bind(filter.user_id)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .fetch_all(db)
    .await
}
