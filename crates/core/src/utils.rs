//! Calendar helpers shared by transaction summaries and the recurring sync.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::errors::{Error, Result};

/// Returns the inclusive `[start, end]` bounds of a calendar month:
/// the first day at 00:00:00 through the last day at 23:59:59.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::invalid_input(format!("Invalid month/year: {}/{}", month, year)))?;
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| Error::invalid_input(format!("Invalid month/year: {}/{}", month, year)))?;
    let start = first.and_hms_opt(0, 0, 0).expect("midnight is valid");
    let end = last.and_hms_opt(23, 59, 59).expect("23:59:59 is valid");
    Ok((start, end))
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("first day is valid");
    first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_spans_full_month() {
        let (start, end) = month_range(2026, 2).unwrap();
        assert_eq!(start.to_string(), "2026-02-01 00:00:00");
        assert_eq!(end.to_string(), "2026-02-28 23:59:59");
    }

    #[test]
    fn month_range_handles_december() {
        let (start, end) = month_range(2025, 12).unwrap();
        assert_eq!(start.date().to_string(), "2025-12-01");
        assert_eq!(end.date().to_string(), "2025-12-31");
    }

    #[test]
    fn month_range_rejects_invalid_month() {
        assert!(month_range(2026, 13).is_err());
        assert!(month_range(2026, 0).is_err());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()),
            29
        );
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2026, 2, 10).unwrap()),
            28
        );
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()),
            31
        );
    }
}
