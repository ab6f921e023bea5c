pub mod json_backend;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::Subscription;

pub use crate::errors::Result;
pub use json_backend::{JsonStorage, STORE_SCHEMA_VERSION};

/// Persistence for subscriptions and string configuration values.
pub trait SubscriptionStore: Send + Sync {
    /// Every stored subscription, in no particular order.
    fn list_subscriptions(&self) -> Result<Vec<Subscription>>;
    fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>>;
    fn insert_subscription(&self, subscription: &Subscription) -> Result<()>;
    /// Replaces an existing subscription; fails with `NotFound` when absent.
    fn update_subscription(&self, subscription: &Subscription) -> Result<()>;
    fn delete_subscription(&self, id: Uuid) -> Result<()>;
    fn persist_renewal_date(&self, id: Uuid, date: NaiveDate) -> Result<()>;

    fn get_config(&self, key: &str) -> Result<Option<String>>;
    fn set_config(&self, key: &str, value: &str) -> Result<()>;
    fn all_config(&self) -> Result<BTreeMap<String, String>>;
}
