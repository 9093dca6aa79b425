use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::FromRow;
use time::Date;
use tracing::warn;

use crate::{
    settings::repo_types::{Setting, FILE_PRICE_KEY, SPINE_PRICE_KEY},
    users::repo_types::WorkType,
};

/// Price per kg for each work type, read from settings.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PriceTable {
    pub file_price_per_kg: Decimal,
    pub spine_price_per_kg: Decimal,
}

fn parse_price(settings: &[Setting], key: &str) -> Decimal {
    let Some(setting) = settings.iter().find(|s| s.key == key) else {
        warn!(%key, "price setting missing; using 0");
        return Decimal::ZERO;
    };
    match Decimal::from_str(setting.value.trim()) {
        Ok(price) => price,
        Err(e) => {
            warn!(%key, value = %setting.value, error = %e, "price setting unparsable; using 0");
            Decimal::ZERO
        }
    }
}

impl PriceTable {
    pub fn from_settings(settings: &[Setting]) -> Self {
        Self {
            file_price_per_kg: parse_price(settings, FILE_PRICE_KEY),
            spine_price_per_kg: parse_price(settings, SPINE_PRICE_KEY),
        }
    }

    /// `Filetagem` has its own price; every other work type uses the spine price.
    pub fn price_for(&self, work_type: &str) -> Decimal {
        if work_type == WorkType::Filetagem.as_str() {
            self.file_price_per_kg
        } else {
            self.spine_price_per_kg
        }
    }
}

/// Weight times price, to the cent, halves away from zero.
pub fn earnings(weight: Decimal, price: Decimal) -> Decimal {
    (weight * price).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Today's and this month's weight for one user.
#[derive(Debug, Clone, FromRow)]
pub struct UserWeights {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub work_type: String,
    pub today_weight: Decimal,
    pub month_weight: Decimal,
}

/// Today's and this month's weight for one work type, across all users.
#[derive(Debug, Clone, FromRow)]
pub struct WorkTypeWeights {
    pub work_type: String,
    pub today_weight: Decimal,
    pub month_weight: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserEarnings {
    pub user_id: i32,
    pub name: String,
    pub work_type: String,
    pub price_per_kg: Decimal,
    pub today_weight: Decimal,
    pub month_weight: Decimal,
    pub today_earnings: Decimal,
    pub month_earnings: Decimal,
}

impl UserEarnings {
    pub fn price(weights: UserWeights, prices: &PriceTable) -> Self {
        let price = prices.price_for(&weights.work_type);
        Self {
            user_id: weights.user_id,
            name: format!("{} {}", weights.first_name, weights.last_name),
            today_earnings: earnings(weights.today_weight, price),
            month_earnings: earnings(weights.month_weight, price),
            price_per_kg: price,
            today_weight: weights.today_weight,
            month_weight: weights.month_weight,
            work_type: weights.work_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EarningsTotals {
    pub today_weight: Decimal,
    pub month_weight: Decimal,
    pub today_earnings: Decimal,
    pub month_earnings: Decimal,
}

impl EarningsTotals {
    /// Each work type's weight is priced at that work type's rate.
    pub fn from_work_types(rows: &[WorkTypeWeights], prices: &PriceTable) -> Self {
        let mut totals = Self {
            today_weight: Decimal::ZERO,
            month_weight: Decimal::ZERO,
            today_earnings: Decimal::ZERO,
            month_earnings: Decimal::ZERO,
        };
        for row in rows {
            let price = prices.price_for(&row.work_type);
            totals.today_weight += row.today_weight;
            totals.month_weight += row.month_weight;
            totals.today_earnings += earnings(row.today_weight, price);
            totals.month_earnings += earnings(row.month_weight, price);
        }
        totals
    }
}

#[derive(Debug, Serialize)]
pub struct EarningsReport {
    pub date: Date,
    pub prices: PriceTable,
    pub users: Vec<UserEarnings>,
    pub totals: EarningsTotals,
}
