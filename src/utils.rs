use crate::error::{PlannerError, Result};
use crate::schema::DaySetting;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month with a 0-based month index, matching `Payment::month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month0: u32,
}

impl YearMonth {
    /// Month indices past 11 roll over into following years.
    pub fn new(year: i32, month0: u32) -> Self {
        Self {
            year: year + (month0 / 12) as i32,
            month0: month0 % 12,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    pub fn offset(self, months: u32) -> Self {
        Self::new(self.year, self.month0 + months)
    }

    /// Calendar month number, 1-12.
    pub fn month(self) -> u32 {
        self.month0 + 1
    }

    /// Day number of the month's last day, `None` outside chrono's year range.
    pub fn last_day(self) -> Option<u32> {
        self.next()
            .first_date()
            .and_then(|first| first.pred_opt())
            .map(|last| last.day())
    }

    pub fn first_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1)
    }

    /// `YYYY-MM`, the readiness key format.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month())
    }

    pub fn parse_key(key: &str) -> Result<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", key.trim()), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| PlannerError::InvalidMonthKey(key.to_string()))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

// Shortest month length; any clamped day at or below it exists in every month.
const SHORTEST_MONTH: u32 = 28;

pub fn last_day_of_month(year: i32, month0: u32) -> Option<u32> {
    YearMonth::new(year, month0).last_day()
}

/// Resolves a nominal day setting to a concrete day of the given month.
///
/// `EndOfMonth` becomes the month's last day. A numeric setting is clamped down to the last day
/// (31 in April gives 30) and never rolls into the next month. A setting of 0 resolves to 1.
pub fn resolve_day(year: i32, month0: u32, setting: DaySetting) -> u32 {
    let last = last_day_of_month(year, month0).unwrap_or(SHORTEST_MONTH);
    match setting {
        DaySetting::EndOfMonth => last,
        DaySetting::Day(day) => day.clamp(1, last),
    }
}

/// Concrete debit date for a setting in the given month. `None` only outside chrono's year range.
pub fn resolve_date(year: i32, month0: u32, setting: DaySetting) -> Option<NaiveDate> {
    let ym = YearMonth::new(year, month0);
    NaiveDate::from_ymd_opt(ym.year, ym.month(), resolve_day(year, month0, setting))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_month_handles_leap_years() {
        assert_eq!(resolve_day(2024, 1, DaySetting::EndOfMonth), 29);
        assert_eq!(resolve_day(2023, 1, DaySetting::EndOfMonth), 28);
        assert_eq!(resolve_day(1900, 1, DaySetting::EndOfMonth), 28);
        assert_eq!(resolve_day(2000, 1, DaySetting::EndOfMonth), 29);
        assert_eq!(resolve_day(2023, 11, DaySetting::EndOfMonth), 31);
    }

    #[test]
    fn test_numeric_day_clamps_to_month_end() {
        assert_eq!(resolve_day(2023, 3, DaySetting::Day(31)), 30);
        assert_eq!(resolve_day(2023, 1, DaySetting::Day(30)), 28);
        assert_eq!(resolve_day(2023, 0, DaySetting::Day(31)), 31);
        assert_eq!(resolve_day(2023, 0, DaySetting::Day(10)), 10);
        assert_eq!(resolve_day(2023, 0, DaySetting::Day(0)), 1);
    }

    #[test]
    fn test_resolved_day_always_in_month() {
        for year in [1999, 2000, 2023, 2024] {
            for month0 in 0..12 {
                let last = last_day_of_month(year, month0).unwrap();
                assert_eq!(resolve_day(year, month0, DaySetting::EndOfMonth), last);
                for day in 1..=31 {
                    let resolved = resolve_day(year, month0, DaySetting::Day(day));
                    assert!((1..=last).contains(&resolved));
                }
            }
        }
    }

    #[test]
    fn test_resolve_date() {
        assert_eq!(
            resolve_date(2024, 1, DaySetting::Day(31)),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            resolve_date(2024, 0, DaySetting::Day(27)),
            NaiveDate::from_ymd_opt(2024, 1, 27)
        );
    }

    #[test]
    fn test_year_month_rollover_and_keys() {
        let dec = YearMonth::new(2023, 11);
        assert_eq!(dec.next(), YearMonth::new(2024, 0));
        assert_eq!(YearMonth::new(2023, 13), YearMonth::new(2024, 1));
        assert_eq!(dec.key(), "2023-12");
        assert_eq!(YearMonth::parse_key("2024-01").unwrap(), YearMonth::new(2024, 0));
        assert!(YearMonth::parse_key("2024-13").is_err());
        assert!(YearMonth::parse_key("202401").is_err());
        assert!(YearMonth::parse_key("2024-00").is_err());
        assert!(YearMonth::parse_key("January").is_err());
        assert_eq!(YearMonth::parse_key(" 1999-12 ").unwrap(), YearMonth::new(1999, 11));
    }

    #[test]
    fn test_last_day_comes_from_the_calendar() {
        assert_eq!(last_day_of_month(2024, 1), Some(29));
        assert_eq!(last_day_of_month(1900, 1), Some(28));
        assert_eq!(last_day_of_month(2000, 1), Some(29));
        assert_eq!(last_day_of_month(2023, 11), Some(31));
        assert_eq!(YearMonth::new(2023, 8).last_day(), Some(30));
        assert_eq!(last_day_of_month(i32::MAX, 0), None);
    }
}
