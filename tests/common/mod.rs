#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use subscription_core::{
    domain::Subscription,
    errors::{Result, TrackerError},
    storage::{JsonStorage, SubscriptionStore},
};
use tempfile::TempDir;
use uuid::Uuid;

/// Creates a store backed by a fresh temporary directory.
/// Keep the returned guard alive for as long as the store is used.
pub fn setup_store() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = JsonStorage::new(Some(temp.path().to_path_buf())).expect("create json storage");
    (store, temp)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Store wrapper whose renewal-date writes fail for selected subscriptions.
pub struct FlakyStore {
    pub inner: JsonStorage,
    pub failing: HashSet<Uuid>,
}

impl SubscriptionStore for FlakyStore {
    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.inner.list_subscriptions()
    }

    fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
        self.inner.get_subscription(id)
    }

    fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.inner.insert_subscription(subscription)
    }

    fn update_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.inner.update_subscription(subscription)
    }

    fn delete_subscription(&self, id: Uuid) -> Result<()> {
        self.inner.delete_subscription(id)
    }

    fn persist_renewal_date(&self, id: Uuid, date: NaiveDate) -> Result<()> {
        if self.failing.contains(&id) {
            return Err(TrackerError::Storage("disk full".into()));
        }
        self.inner.persist_renewal_date(id, date)
    }

    fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_config(key)
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set_config(key, value)
    }

    fn all_config(&self) -> Result<BTreeMap<String, String>> {
        self.inner.all_config()
    }
}
