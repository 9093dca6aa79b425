use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::{
    error::AppError,
    settings::{repo, repo_types::Setting},
};

lazy_static! {
    static ref KEY_RE: Regex = Regex::new(r"^[a-z0-9_]{1,100}$").expect("valid settings key regex");
}

pub fn is_price_key(key: &str) -> bool {
    key.ends_with("_price_per_kg")
}

/// Prices are non-negative decimals; other values are free text up to 255 chars.
pub fn validate_setting(key: &str, value: &str) -> Result<String, AppError> {
    if !KEY_RE.is_match(key) {
        return Err(AppError::validation("Invalid setting key"));
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation("Value is required"));
    }
    if value.chars().count() > 255 {
        return Err(AppError::validation("Value is too long"));
    }
    if is_price_key(key) {
        let price = Decimal::from_str(value)
            .map_err(|_| AppError::validation("Price must be a decimal number"))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(AppError::validation("Price must not be negative"));
        }
    }
    Ok(value.to_string())
}

pub async fn update_setting(
    db: &PgPool,
    key: &str,
    value: &str,
    by: i32,
) -> Result<Setting, AppError> {
    let value = validate_setting(key, value)?;
    let setting = repo::set_setting(db, key, &value).await?;
    info!(%key, value = %setting.value, by, "setting updated");
    Ok(setting)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_must_be_non_negative_decimals() {
        assert_eq!(validate_setting("file_price_per_kg", " 13.75 ").unwrap(), "13.75");
        assert_eq!(validate_setting("spine_price_per_kg", "0").unwrap(), "0");
        assert!(validate_setting("file_price_per_kg", "-1").is_err());
        assert!(validate_setting("file_price_per_kg", "abc").is_err());
        assert!(validate_setting("file_price_per_kg", "").is_err());
    }

    #[test]
    fn keys_are_restricted_and_other_values_are_free_text() {
        assert!(validate_setting("Bad Key", "x").is_err());
        assert!(validate_setting("", "x").is_err());
        assert_eq!(validate_setting("company_name", "Pesqueira").unwrap(), "Pesqueira");
        assert!(validate_setting("company_name", &"x".repeat(256)).is_err());
    }
}
