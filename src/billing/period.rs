use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};

use super::calendar::clamped_date;

pub const DEFAULT_CUTOFF_DAY: u32 = 1;
pub const MAX_CUTOFF_DAY: u32 = 28;

/// Inclusive day range `[start, end]` labeled by the month it closes in.
///
/// `start` is the cutoff day of the previous month, `end` the day before the
/// cutoff day of the labeled month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
    pub cutoff_day: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First instant of the period.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    /// Last instant of the period: one second before the next period starts.
    pub fn end_instant(&self) -> NaiveDateTime {
        self.end_exclusive().and_time(chrono::NaiveTime::MIN) - Duration::seconds(1)
    }

    /// The cutoff day of the labeled month, where the following period begins.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end + Duration::days(1)
    }

    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

pub fn validate_month(month: u32) -> Result<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(TrackerError::InvalidArgument(format!(
            "month must be between 1 and 12, got {month}"
        )))
    }
}

pub fn validate_cutoff_day(day: u32) -> Result<u32> {
    if (1..=MAX_CUTOFF_DAY).contains(&day) {
        Ok(day)
    } else {
        Err(TrackerError::InvalidArgument(format!(
            "cutoff day must be between 1 and {MAX_CUTOFF_DAY}, got {day}"
        )))
    }
}

/// Resolves the billing period labeled `(year, month)` for the given cutoff day.
///
/// January with cutoff 22 covers Dec 22 of the previous year through Jan 21.
pub fn resolve_period(year: i32, month: u32, cutoff_day: u32) -> Result<BillingPeriod> {
    validate_month(month)?;
    validate_cutoff_day(cutoff_day)?;

    let (prev_year, prev_month) = if month == 1 {
        let prev_year = year.checked_sub(1).ok_or_else(|| {
            TrackerError::InvalidArgument(format!("year {year} is out of range"))
        })?;
        (prev_year, 12)
    } else {
        (year, month - 1)
    };

    let start = clamped_date(prev_year, prev_month, cutoff_day).ok_or_else(|| {
        TrackerError::InvalidArgument(format!("year {prev_year} is out of range"))
    })?;
    let next_start = clamped_date(year, month, cutoff_day)
        .ok_or_else(|| TrackerError::InvalidArgument(format!("year {year} is out of range")))?;

    Ok(BillingPeriod {
        year,
        month,
        cutoff_day,
        start,
        end: next_start - Duration::days(1),
    })
}

/// Label `(year, month)` of the period containing `today`.
///
/// On or after the cutoff day the running period is the one closing next month.
pub fn period_label_for(today: NaiveDate, cutoff_day: u32) -> (i32, u32) {
    let (year, month) = (today.year(), today.month());
    if today.day() >= cutoff_day {
        if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        }
    } else {
        (year, month)
    }
}
