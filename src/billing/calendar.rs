//! Month-length aware date shifting shared by the period matcher and the
//! renewal advancer.

use chrono::{Datelike, NaiveDate};

/// Number of days in `month` of `year` (28 to 31). Months outside 1..=12 yield 0.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Builds `day` of the given month, clamping to the month's last day.
///
/// Returns `None` only when `month` is outside 1..=12 or the year is outside
/// chrono's supported range.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month);
    if last == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Moves `date` by `months` calendar months, clamping the day to the target
/// month. The clamp is computed against the target month every time, so a
/// sequence of shifts never remembers an earlier clamp.
///
/// `None` when the target month lies outside chrono's supported range.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = (date.year() * 12 + date.month0() as i32).checked_add(months)?;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    clamped_date(year, month, date.day())
}

/// Moves `date` by `years`, clamping Feb 29 to Feb 28 in non-leap years.
pub fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    clamped_date(date.year().checked_add(years)?, date.month(), date.day())
}

/// Jan 31 → Feb 28 (or Feb 29 in leap years); Dec rolls into January.
pub fn add_one_month(date: NaiveDate) -> Option<NaiveDate> {
    shift_month(date, 1)
}

pub fn add_one_year(date: NaiveDate) -> Option<NaiveDate> {
    shift_year(date, 1)
}
