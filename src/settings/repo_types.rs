use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

pub const FILE_PRICE_KEY: &str = "file_price_per_kg";
pub const SPINE_PRICE_KEY: &str = "spine_price_per_kg";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Setting {
    pub id: i32,
    pub key: String,
    pub value: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
