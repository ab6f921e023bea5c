use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::Subscription,
    errors::TrackerError,
    utils::{
        persistence::{ensure_dir, write_atomic},
        store_file_in,
    },
};

use super::{Result, SubscriptionStore};

pub const STORE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "current_schema_version")]
    schema_version: u32,
    #[serde(default)]
    subscriptions: Vec<Subscription>,
    #[serde(default)]
    config: BTreeMap<String, String>,
}

fn current_schema_version() -> u32 {
    STORE_SCHEMA_VERSION
}

/// Single-file JSON store. Every operation reads the document, applies the
/// change, and writes it back atomically.
pub struct JsonStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonStorage {
    /// Opens the store inside `root`, or inside the default data directory.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        Self::open(store_file_in(root))
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    /// Opens the store at an explicit file path, creating parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| TrackerError::Storage("store lock poisoned".into()))
    }

    fn read_document(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        let document: StoreDocument = serde_json::from_str(&data)?;
        if document.schema_version > STORE_SCHEMA_VERSION {
            return Err(TrackerError::Storage(format!(
                "store `{}` was written by a newer schema version ({})",
                self.path.display(),
                document.schema_version
            )));
        }
        Ok(document)
    }

    fn write_document(&self, document: &StoreDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(&self.path, &json)
    }

    fn modify<T>(&self, change: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let _guard = self.guard()?;
        let mut document = self.read_document()?;
        let outcome = change(&mut document)?;
        document.schema_version = STORE_SCHEMA_VERSION;
        self.write_document(&document)?;
        Ok(outcome)
    }

    fn read<T>(&self, view: impl FnOnce(StoreDocument) -> T) -> Result<T> {
        let _guard = self.guard()?;
        Ok(view(self.read_document()?))
    }
}

impl SubscriptionStore for JsonStorage {
    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.read(|document| document.subscriptions)
    }

    fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
        self.read(|document| document.subscriptions.into_iter().find(|sub| sub.id == id))
    }

    fn insert_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.modify(|document| {
            if document.subscriptions.iter().any(|sub| sub.id == subscription.id) {
                return Err(TrackerError::Storage(format!(
                    "subscription {} already exists",
                    subscription.id
                )));
            }
            document.subscriptions.push(subscription.clone());
            Ok(())
        })
    }

    fn update_subscription(&self, subscription: &Subscription) -> Result<()> {
        self.modify(|document| {
            let slot = document
                .subscriptions
                .iter_mut()
                .find(|sub| sub.id == subscription.id)
                .ok_or(TrackerError::NotFound(subscription.id))?;
            *slot = subscription.clone();
            Ok(())
        })
    }

    fn delete_subscription(&self, id: Uuid) -> Result<()> {
        self.modify(|document| {
            let before = document.subscriptions.len();
            document.subscriptions.retain(|sub| sub.id != id);
            if document.subscriptions.len() == before {
                return Err(TrackerError::NotFound(id));
            }
            Ok(())
        })
    }

    fn persist_renewal_date(&self, id: Uuid, date: NaiveDate) -> Result<()> {
        self.modify(|document| {
            let slot = document
                .subscriptions
                .iter_mut()
                .find(|sub| sub.id == id)
                .ok_or(TrackerError::NotFound(id))?;
            slot.next_renewal_date = Some(date);
            slot.updated_at = Utc::now();
            Ok(())
        })
    }

    fn get_config(&self, key: &str) -> Result<Option<String>> {
        self.read(|document| document.config.get(key).cloned())
    }

    fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|document| {
            document.config.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn all_config(&self) -> Result<BTreeMap<String, String>> {
        self.read(|document| document.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillingCycle;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    fn sample() -> Subscription {
        Subscription::new(
            "Cloud",
            4.99,
            "USD",
            BillingCycle::Monthly,
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        )
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.list_subscriptions().unwrap().is_empty());
        assert_eq!(storage.get_config("month_cutoff_day").unwrap(), None);
    }

    #[test]
    fn insert_update_delete_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let mut sub = sample();
        storage.insert_subscription(&sub).unwrap();
        assert!(storage.insert_subscription(&sub).is_err());

        sub.amount = 5.99;
        storage.update_subscription(&sub).unwrap();
        let loaded = storage.get_subscription(sub.id).unwrap().unwrap();
        assert_eq!(loaded.amount, 5.99);

        storage.delete_subscription(sub.id).unwrap();
        assert!(matches!(
            storage.delete_subscription(sub.id),
            Err(TrackerError::NotFound(_))
        ));
    }

    #[test]
    fn persist_renewal_date_rewrites_only_the_date() {
        let (storage, _guard) = storage_with_temp_dir();
        let sub = sample();
        storage.insert_subscription(&sub).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        storage.persist_renewal_date(sub.id, date).unwrap();
        let loaded = storage.get_subscription(sub.id).unwrap().unwrap();
        assert_eq!(loaded.next_renewal_date, Some(date));
        assert_eq!(loaded.name, sub.name);
        assert_eq!(loaded.created_at, sub.created_at);
    }

    #[test]
    fn config_values_persist() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.set_config("monthly_salary", "3000.00").unwrap();
        storage.set_config("monthly_salary", "3100.00").unwrap();
        assert_eq!(
            storage.get_config("monthly_salary").unwrap().as_deref(),
            Some("3100.00")
        );
        assert_eq!(storage.all_config().unwrap().len(), 1);
    }

    #[test]
    fn refuses_newer_schema() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(
            storage.path(),
            r#"{"schema_version": 99, "subscriptions": [], "config": {}}"#,
        )
        .unwrap();
        assert!(matches!(
            storage.list_subscriptions(),
            Err(TrackerError::Storage(_))
        ));
    }
}
