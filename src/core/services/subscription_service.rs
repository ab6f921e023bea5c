use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::billing::{advance_from, RenewalUpdate};
use crate::config::ConfigService;
use crate::domain::{
    parse_renewal_date, BillingCycle, Identifiable, NamedEntity, Subscription, SubscriptionDraft,
};
use crate::errors::TrackerError;
use crate::storage::SubscriptionStore;

use super::ServiceResult;

/// A renewal date that could not be persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RenewalFailure {
    pub id: Uuid,
    pub name: String,
    pub error: String,
}

/// Outcome of one renewal advancement pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenewalReport {
    pub updated: Vec<RenewalUpdate>,
    pub failures: Vec<RenewalFailure>,
}

impl RenewalReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct SubscriptionService<'a> {
    store: &'a dyn SubscriptionStore,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(store: &'a dyn SubscriptionStore) -> Self {
        Self { store }
    }

    pub fn create(&self, draft: &SubscriptionDraft) -> ServiceResult<Subscription> {
        let valid = draft.validate()?;
        let currency = match valid.currency {
            Some(code) => code,
            None => ConfigService::new(self.store).settings().default_currency,
        };
        let subscription = Subscription::new(
            valid.name,
            valid.amount,
            currency,
            valid.billing_cycle,
            valid.next_renewal_date,
        );
        self.store.insert_subscription(&subscription)?;
        tracing::info!(id = %subscription.id, name = %subscription.name, "subscription created");
        Ok(subscription)
    }

    pub fn get(&self, id: Uuid) -> ServiceResult<Subscription> {
        self.store
            .get_subscription(id)?
            .ok_or(TrackerError::NotFound(id))
    }

    /// Lists subscriptions sorted by name, optionally restricted to one cycle.
    pub fn list(&self, filter: Option<BillingCycle>) -> ServiceResult<Vec<Subscription>> {
        let mut subscriptions: Vec<Subscription> = self
            .store
            .list_subscriptions()?
            .into_iter()
            .filter(|sub| filter.map_or(true, |cycle| sub.billing_cycle == cycle))
            .collect();
        subscriptions.sort_by_key(|sub| sub.name.to_lowercase());
        Ok(subscriptions)
    }

    /// Replaces every editable field. Missing currency keeps the stored one.
    pub fn update(&self, id: Uuid, draft: &SubscriptionDraft) -> ServiceResult<Subscription> {
        let valid = draft.validate()?;
        let mut subscription = self.get(id)?;
        subscription.name = valid.name;
        subscription.amount = valid.amount;
        if let Some(code) = valid.currency {
            subscription.currency = code;
        }
        subscription.billing_cycle = valid.billing_cycle;
        subscription.next_renewal_date = Some(valid.next_renewal_date);
        subscription.updated_at = Utc::now();
        self.store.update_subscription(&subscription)?;
        tracing::info!(%id, "subscription updated");
        Ok(subscription)
    }

    pub fn update_renewal_date(&self, id: Uuid, text: &str) -> ServiceResult<NaiveDate> {
        let date = parse_renewal_date(text)?;
        self.get(id)?;
        self.store.persist_renewal_date(id, date)?;
        tracing::info!(%id, %date, "renewal date set");
        Ok(date)
    }

    pub fn delete(&self, id: Uuid) -> ServiceResult<()> {
        self.store.delete_subscription(id)?;
        tracing::info!(%id, "subscription deleted");
        Ok(())
    }

    /// Moves every past renewal date forward to on or after `today`.
    ///
    /// A failed write is recorded in the report and the pass continues.
    pub fn advance_renewal_dates(&self, today: NaiveDate) -> ServiceResult<RenewalReport> {
        let subscriptions = self.store.list_subscriptions()?;
        let mut report = RenewalReport::default();
        for update in advance_from(&subscriptions, today) {
            match self.store.persist_renewal_date(update.id, update.next) {
                Ok(()) => {
                    tracing::info!(
                        id = %update.id,
                        previous = %update.previous,
                        next = %update.next,
                        "renewal date advanced"
                    );
                    report.updated.push(update);
                }
                Err(err) => {
                    let name = subscriptions
                        .iter()
                        .find(|sub| sub.id() == update.id)
                        .map(|sub| sub.name().to_string())
                        .unwrap_or_default();
                    tracing::warn!(id = %update.id, error = %err, "failed to advance renewal date");
                    report.failures.push(RenewalFailure {
                        id: update.id,
                        name,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }
}
