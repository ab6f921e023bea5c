//! Rolls stored renewal dates forward so they never drift into the past.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{BillingCycle, Subscription};

use super::calendar::{add_one_month, add_one_year};

/// A renewal date that should be rewritten.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RenewalUpdate {
    pub id: Uuid,
    pub previous: NaiveDate,
    pub next: NaiveDate,
}

/// Steps `current` by one billing cycle at a time until it is on or after
/// `reference`. Dates already on or after `reference` come back unchanged.
///
/// `None` when a step would leave chrono's supported date range before
/// reaching `reference`.
pub fn next_renewal_on_or_after(
    current: NaiveDate,
    cycle: BillingCycle,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let step: fn(NaiveDate) -> Option<NaiveDate> = match cycle {
        BillingCycle::Monthly => add_one_month,
        BillingCycle::Yearly => add_one_year,
    };
    let mut date = current;
    while date < reference {
        date = step(date)?;
    }
    Some(date)
}

/// Computes the renewal updates needed so every stored date is on or after
/// `reference`. Subscriptions without a usable date, already current, or
/// whose next renewal falls outside the supported calendar are left out;
/// applying the result and calling again yields nothing.
pub fn advance_from(subscriptions: &[Subscription], reference: NaiveDate) -> Vec<RenewalUpdate> {
    subscriptions
        .iter()
        .filter_map(|subscription| {
            let previous = subscription.next_renewal_date?;
            if previous >= reference {
                return None;
            }
            let Some(next) =
                next_renewal_on_or_after(previous, subscription.billing_cycle, reference)
            else {
                tracing::warn!(
                    id = %subscription.id,
                    %previous,
                    %reference,
                    "renewal date cannot be advanced within the supported calendar"
                );
                return None;
            };
            tracing::trace!(id = %subscription.id, %previous, %next, "renewal date due");
            Some(RenewalUpdate {
                id: subscription.id,
                previous,
                next,
            })
        })
        .collect()
}
