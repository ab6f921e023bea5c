//! Billing-period accounting: calendar arithmetic, period resolution,
//! recurrence matching, spending summaries, and renewal advancement.
//!
//! Everything here is pure; callers fetch subscriptions and settings from a
//! store and persist whatever the renewal advancer returns.

pub mod calendar;
pub mod month;
pub mod period;
pub mod recurrence;
pub mod renewal;
pub mod summary;

pub use calendar::{add_one_month, add_one_year, last_day_of_month};
pub use month::parse_month;
pub use period::{period_label_for, resolve_period, BillingPeriod, DEFAULT_CUTOFF_DAY};
pub use recurrence::{monthly_matches, yearly_matches};
pub use renewal::{advance_from, next_renewal_on_or_after, RenewalUpdate};
pub use summary::{annual_total, summarize, SpendingSummary};
