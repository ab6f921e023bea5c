use serde::Serialize;

use crate::domain::{BillingCycle, Subscription};
use crate::errors::Result;

use super::period::{resolve_period, BillingPeriod};
use super::recurrence::matches;

/// Spending within one billing period.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpendingSummary {
    pub period: BillingPeriod,
    pub monthly_items: Vec<Subscription>,
    pub yearly_items: Vec<Subscription>,
    pub monthly_total: f64,
    pub yearly_total: f64,
    pub grand_total: f64,
    /// `monthly_total + yearly_total / 12`.
    pub average_monthly: f64,
    /// `None` when no salary is configured.
    pub monthly_salary: Option<f64>,
    /// `salary - grand_total`; negative when over budget.
    pub remaining: Option<f64>,
}

impl SpendingSummary {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_some_and(|remaining| remaining < 0.0)
    }

    pub fn item_count(&self) -> usize {
        self.monthly_items.len() + self.yearly_items.len()
    }
}

/// Totals the subscriptions that renew inside the period labeled `(year, month)`.
///
/// A `salary` of zero or less means "not configured" and leaves `remaining` unset.
pub fn summarize(
    subscriptions: &[Subscription],
    year: i32,
    month: u32,
    cutoff_day: u32,
    salary: f64,
) -> Result<SpendingSummary> {
    let period = resolve_period(year, month, cutoff_day)?;

    let mut monthly_items = Vec::new();
    let mut yearly_items = Vec::new();
    for subscription in subscriptions {
        if !matches(
            subscription.billing_cycle,
            subscription.next_renewal_date,
            &period,
        ) {
            continue;
        }
        match subscription.billing_cycle {
            BillingCycle::Monthly => monthly_items.push(subscription.clone()),
            BillingCycle::Yearly => yearly_items.push(subscription.clone()),
        }
    }

    let monthly_total: f64 = monthly_items.iter().map(|sub| sub.amount).sum();
    let yearly_total: f64 = yearly_items.iter().map(|sub| sub.amount).sum();
    let grand_total = monthly_total + yearly_total;

    let (monthly_salary, remaining) = if salary > 0.0 {
        (Some(salary), Some(salary - grand_total))
    } else {
        (None, None)
    };

    tracing::debug!(
        period = %period.label(),
        monthly = monthly_items.len(),
        yearly = yearly_items.len(),
        grand_total,
        "summarized billing period"
    );

    Ok(SpendingSummary {
        period,
        monthly_items,
        yearly_items,
        monthly_total,
        yearly_total,
        grand_total,
        average_monthly: monthly_total + yearly_total / 12.0,
        monthly_salary,
        remaining,
    })
}

/// Cost of the whole set over a year: monthly amounts twelve times, yearly once.
pub fn annual_total(subscriptions: &[Subscription]) -> f64 {
    subscriptions
        .iter()
        .map(|sub| match sub.billing_cycle {
            BillingCycle::Monthly => sub.amount * 12.0,
            BillingCycle::Yearly => sub.amount,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TrackerError;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sub(name: &str, amount: f64, cycle: BillingCycle, renewal: NaiveDate) -> Subscription {
        Subscription::new(name, amount, "USD", cycle, renewal)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn yearly_included_only_in_its_period() {
        // Cutoff 1: the July label covers June 1..=June 30.
        let subs = vec![sub("Domain", 120.0, BillingCycle::Yearly, date(2025, 6, 15))];

        let july_2025 = summarize(&subs, 2025, 7, 1, 0.0).unwrap();
        assert_eq!(july_2025.yearly_items.len(), 1);
        assert!(close(july_2025.yearly_total, 120.0));
        assert!(close(july_2025.average_monthly, 10.0));

        let june_2025 = summarize(&subs, 2025, 6, 1, 0.0).unwrap();
        assert!(june_2025.yearly_items.is_empty());

        // Yearly dates are literal; the next year's period needs an advanced date.
        let july_2026 = summarize(&subs, 2026, 7, 1, 0.0).unwrap();
        assert!(july_2026.yearly_items.is_empty());
        assert!(close(july_2026.yearly_total, 0.0));
    }

    #[test]
    fn monthly_items_match_every_period() {
        let subs = vec![
            sub("Music", 9.99, BillingCycle::Monthly, date(2026, 1, 20)),
            sub("Video", 15.99, BillingCycle::Monthly, date(2024, 3, 31)),
        ];
        for month in 1..=12 {
            let summary = summarize(&subs, 2026, month, 15, 0.0).unwrap();
            assert_eq!(summary.monthly_items.len(), 2);
            assert!(close(summary.monthly_total, 25.98));
        }
    }

    #[test]
    fn remaining_uses_salary_when_configured() {
        let subs = vec![
            sub("Music", 9.99, BillingCycle::Monthly, date(2026, 1, 5)),
            sub("Video", 15.99, BillingCycle::Monthly, date(2026, 1, 10)),
        ];
        let summary = summarize(&subs, 2026, 1, 1, 3000.0).unwrap();
        assert!(close(summary.grand_total, 25.98));
        assert_eq!(summary.monthly_salary, Some(3000.0));
        assert!(close(summary.remaining.unwrap(), 2974.02));

        let unset = summarize(&subs, 2026, 1, 1, 0.0).unwrap();
        assert_eq!(unset.monthly_salary, None);
        assert_eq!(unset.remaining, None);
    }

    #[test]
    fn over_budget_remaining_is_negative() {
        let subs = vec![sub("Rent", 1500.0, BillingCycle::Monthly, date(2026, 1, 1))];
        let summary = summarize(&subs, 2026, 2, 1, 1000.0).unwrap();
        assert!(close(summary.remaining.unwrap(), -500.0));
        assert!(summary.is_over_budget());
    }

    #[test]
    fn subscriptions_without_dates_are_skipped() {
        let mut broken = sub("Broken", 50.0, BillingCycle::Monthly, date(2026, 1, 1));
        broken.next_renewal_date = None;
        let good = sub("Good", 5.0, BillingCycle::Monthly, date(2026, 1, 1));
        let summary = summarize(&[broken, good], 2026, 1, 1, 0.0).unwrap();
        assert_eq!(summary.item_count(), 1);
        assert!(close(summary.grand_total, 5.0));
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(matches!(
            summarize(&[], 2026, 13, 1, 0.0),
            Err(TrackerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn annual_total_weights_by_cycle() {
        let subs = vec![
            sub("Music", 10.0, BillingCycle::Monthly, date(2026, 1, 1)),
            sub("Domain", 12.0, BillingCycle::Yearly, date(2026, 6, 1)),
        ];
        assert!(close(annual_total(&subs), 132.0));
    }
}
