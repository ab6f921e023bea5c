pub mod common;
pub mod subscription;

pub use common::{Identifiable, NamedEntity};
pub use subscription::{
    parse_renewal_date, BillingCycle, Subscription, SubscriptionDraft, ValidatedDraft,
    DATE_FORMAT, DEFAULT_CURRENCY,
};
