//! Decides whether a stored renewal date renews inside a billing period.
//!
//! A missing renewal date (absent or unparsable in storage) never matches; the
//! record is left out of the period instead of failing the whole query.

use chrono::{Datelike, NaiveDate};

use crate::domain::BillingCycle;

use super::calendar::{clamped_date, shift_month};
use super::period::BillingPeriod;

/// Yearly renewals match only when the stored date itself lies in the period.
pub fn yearly_matches(stored: Option<NaiveDate>, period: &BillingPeriod) -> bool {
    stored.is_some_and(|date| period.contains(date))
}

/// Monthly renewals match when the stored date lies in the period, or when the
/// stored day-of-month, projected into any month the period touches, does.
pub fn monthly_matches(stored: Option<NaiveDate>, period: &BillingPeriod) -> bool {
    let Some(date) = stored else {
        return false;
    };
    if period.contains(date) {
        return true;
    }
    monthly_occurrence_in(date.day(), period).is_some()
}

pub fn matches(cycle: BillingCycle, stored: Option<NaiveDate>, period: &BillingPeriod) -> bool {
    match cycle {
        BillingCycle::Monthly => monthly_matches(stored, period),
        BillingCycle::Yearly => yearly_matches(stored, period),
    }
}

/// First clamped occurrence of `day` inside the period, walking each calendar
/// month from the one holding `period.start` to the one holding `period.end`.
pub fn monthly_occurrence_in(day: u32, period: &BillingPeriod) -> Option<NaiveDate> {
    let first = period.start.with_day(1)?;
    let last = period.end.with_day(1)?;

    let mut month_start = first;
    while month_start <= last {
        let candidate = clamped_date(month_start.year(), month_start.month(), day)?;
        if period.contains(candidate) {
            return Some(candidate);
        }
        month_start = shift_month(month_start, 1)?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::period::resolve_period;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yearly_matches_inclusive_bounds() {
        let period = resolve_period(2026, 2, 15).unwrap();
        assert!(yearly_matches(Some(date(2026, 1, 15)), &period));
        assert!(yearly_matches(Some(date(2026, 2, 14)), &period));
        assert!(!yearly_matches(Some(date(2026, 2, 15)), &period));
        assert!(!yearly_matches(Some(date(2026, 1, 14)), &period));
        assert!(!yearly_matches(Some(date(2025, 1, 20)), &period));
        assert!(!yearly_matches(None, &period));
    }

    #[test]
    fn monthly_projects_day_into_touched_months() {
        let period = resolve_period(2026, 2, 15).unwrap();
        assert_eq!(monthly_occurrence_in(20, &period), Some(date(2026, 1, 20)));
        assert_eq!(monthly_occurrence_in(10, &period), Some(date(2026, 2, 10)));
        assert_eq!(monthly_occurrence_in(14, &period), Some(date(2026, 2, 14)));
        assert_eq!(monthly_occurrence_in(15, &period), Some(date(2026, 1, 15)));
        assert!(monthly_matches(Some(date(2023, 7, 20)), &period));
    }

    #[test]
    fn monthly_projection_clamps_month_end_days() {
        // With cutoff 1 the March label covers February.
        let period = resolve_period(2026, 3, 1).unwrap();
        assert_eq!(monthly_occurrence_in(31, &period), Some(date(2026, 2, 28)));

        let leap = resolve_period(2024, 3, 1).unwrap();
        assert_eq!(monthly_occurrence_in(30, &leap), Some(date(2024, 2, 29)));
    }

    #[test]
    fn monthly_crosses_year_boundary() {
        let period = resolve_period(2026, 1, 20).unwrap();
        assert!(monthly_matches(Some(date(2025, 12, 25)), &period));
        assert!(monthly_matches(Some(date(2026, 1, 10)), &period));
    }

    #[test]
    fn every_valid_monthly_day_matches_every_period() {
        for cutoff in 1..=28 {
            for month in 1..=12 {
                let period = resolve_period(2025, month, cutoff).unwrap();
                for day in 1..=31 {
                    assert!(
                        monthly_occurrence_in(day, &period).is_some(),
                        "day {day} cutoff {cutoff} month {month}"
                    );
                }
            }
        }
    }

    #[test]
    fn missing_date_never_matches() {
        let period = resolve_period(2026, 6, 1).unwrap();
        assert!(!monthly_matches(None, &period));
        assert!(!matches(BillingCycle::Yearly, None, &period));
    }

    #[test]
    fn last_supported_period_still_projects() {
        let period = resolve_period(262143, 12, 1).unwrap();
        assert_eq!(monthly_occurrence_in(31, &period), Some(date(262143, 11, 30)));
    }
}
