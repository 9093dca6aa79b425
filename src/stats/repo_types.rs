use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, Duration};

/// Date boundaries every aggregate is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub today: Date,
    pub month_start: Date,
    /// Exclusive upper bound of the month.
    pub next_month_start: Date,
    /// Inclusive lower bound of the trailing week, with no upper bound.
    pub week_start: Date,
}

impl StatsWindow {
    pub fn for_day(today: Date) -> Self {
        let month_start = today - Duration::days(i64::from(today.day()) - 1);
        let month_len = today.month().length(today.year());
        Self {
            today,
            month_start,
            next_month_start: month_start + Duration::days(i64::from(month_len)),
            week_start: today - Duration::days(7),
        }
    }
}

/// Per-user (or all-users, when unscoped) production aggregates.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct UserStats {
    pub today_total: Decimal,
    pub month_total: Decimal,
    pub weekly_average: Decimal,
    pub heaviest_entry: Decimal,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl UserStats {
    /// All-zero stats, flagged when they stand in for a failed query.
    pub fn zero(degraded: bool) -> Self {
        Self {
            today_total: Decimal::ZERO,
            month_total: Decimal::ZERO,
            weekly_average: Decimal::ZERO,
            heaviest_entry: Decimal::ZERO,
            degraded,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct GlobalStats {
    pub today_total: Decimal,
    pub month_total: Decimal,
    pub weekly_average: Decimal,
    pub heaviest_entry: Decimal,
    pub active_users_today: i64,
    pub total_records: i64,
    pub total_users: i64,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl GlobalStats {
    pub fn zero(degraded: bool) -> Self {
        Self {
            today_total: Decimal::ZERO,
            month_total: Decimal::ZERO,
            weekly_average: Decimal::ZERO,
            heaviest_entry: Decimal::ZERO,
            active_users_today: 0,
            total_records: 0,
            total_users: 0,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn window_mid_month() {
        let w = StatsWindow::for_day(date!(2024 - 01 - 10));
        assert_eq!(w.month_start, date!(2024 - 01 - 01));
        assert_eq!(w.next_month_start, date!(2024 - 02 - 01));
        assert_eq!(w.week_start, date!(2024 - 01 - 03));
    }

    #[test]
    fn window_on_first_day_crosses_into_previous_month_for_the_week() {
        let w = StatsWindow::for_day(date!(2024 - 03 - 01));
        assert_eq!(w.month_start, date!(2024 - 03 - 01));
        assert_eq!(w.next_month_start, date!(2024 - 04 - 01));
        assert_eq!(w.week_start, date!(2024 - 02 - 23));
    }

    #[test]
    fn window_handles_leap_february_and_year_end() {
        let feb = StatsWindow::for_day(date!(2024 - 02 - 29));
        assert_eq!(feb.month_start, date!(2024 - 02 - 01));
        assert_eq!(feb.next_month_start, date!(2024 - 03 - 01));

        let dec = StatsWindow::for_day(date!(2024 - 12 - 31));
        assert_eq!(dec.month_start, date!(2024 - 12 - 01));
        assert_eq!(dec.next_month_start, date!(2025 - 01 - 01));
    }

    #[test]
    fn degraded_flag_only_serialized_when_set() {
        let ok = serde_json::to_value(UserStats::zero(false)).unwrap();
        assert!(ok.get("degraded").is_none());
        assert_eq!(ok["today_total"], "0");

        let bad = serde_json::to_value(UserStats::zero(true)).unwrap();
        assert_eq!(bad["degraded"], true);
    }
}
