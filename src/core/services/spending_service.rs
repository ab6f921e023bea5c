use chrono::NaiveDate;

use crate::billing::{annual_total, period_label_for, summarize, SpendingSummary};
use crate::config::ConfigService;
use crate::domain::Subscription;
use crate::storage::SubscriptionStore;

use super::ServiceResult;

/// Combines stored subscriptions with the configured cutoff and salary.
pub struct SpendingService<'a> {
    store: &'a dyn SubscriptionStore,
}

impl<'a> SpendingService<'a> {
    pub fn new(store: &'a dyn SubscriptionStore) -> Self {
        Self { store }
    }

    pub fn calculate_for_month(&self, year: i32, month: u32) -> ServiceResult<SpendingSummary> {
        let settings = ConfigService::new(self.store).settings();
        let subscriptions = self.store.list_subscriptions()?;
        summarize(
            &subscriptions,
            year,
            month,
            settings.month_cutoff_day,
            settings.monthly_salary,
        )
    }

    pub fn current_period_label(today: NaiveDate, cutoff_day: u32) -> (i32, u32) {
        period_label_for(today, cutoff_day)
    }

    /// Summary of the period that is running on `today`.
    pub fn calculate_for_today(&self, today: NaiveDate) -> ServiceResult<SpendingSummary> {
        let cutoff = ConfigService::new(self.store).month_cutoff_day();
        let (year, month) = Self::current_period_label(today, cutoff);
        self.calculate_for_month(year, month)
    }

    pub fn annual_total(&self) -> ServiceResult<f64> {
        Ok(Self::annual_total_of(&self.store.list_subscriptions()?))
    }

    pub fn annual_total_of(subscriptions: &[Subscription]) -> f64 {
        annual_total(subscriptions)
    }
}
