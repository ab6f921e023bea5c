mod common;

use std::fs;

use common::{close, date, setup_store};
use subscription_core::{
    core::services::{SpendingService, SubscriptionService},
    domain::{BillingCycle, Subscription},
    storage::{JsonStorage, SubscriptionStore, STORE_SCHEMA_VERSION},
    utils::persistence::tmp_path,
};

#[test]
fn data_survives_reopening_the_store() {
    let (store, guard) = setup_store();
    let sub = Subscription::new("Music", 9.99, "USD", BillingCycle::Monthly, date(2026, 1, 5));
    store.insert_subscription(&sub).unwrap();
    store.set_config("month_cutoff_day", "15").unwrap();
    let path = store.path().to_path_buf();
    drop(store);

    let reopened = JsonStorage::new(Some(guard.path().to_path_buf())).unwrap();
    assert_eq!(reopened.path(), path.as_path());
    let loaded = reopened.list_subscriptions().unwrap();
    assert_eq!(loaded, vec![sub]);
    assert_eq!(
        reopened.get_config("month_cutoff_day").unwrap().as_deref(),
        Some("15")
    );
    assert!(!tmp_path(&path).exists());
}

#[test]
fn document_records_schema_version() {
    let (store, _guard) = setup_store();
    store.set_config("monthly_salary", "1000.00").unwrap();
    let raw = fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schema_version"], STORE_SCHEMA_VERSION);
    assert!(value["subscriptions"].as_array().unwrap().is_empty());
    assert_eq!(value["config"]["monthly_salary"], "1000.00");
}

#[test]
fn malformed_renewal_dates_load_as_missing() {
    let (store, _guard) = setup_store();
    let good = Subscription::new("Good", 5.0, "USD", BillingCycle::Monthly, date(2026, 1, 5));
    store.insert_subscription(&good).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let mut broken = value["subscriptions"][0].clone();
    broken["id"] = serde_json::json!("6f1c1f0e-8f55-4c77-9f0e-3d0c8c2b8f11");
    broken["name"] = serde_json::json!("Broken");
    broken["next_renewal_date"] = serde_json::json!("31/01/2026");
    value["subscriptions"]
        .as_array_mut()
        .unwrap()
        .push(broken);
    fs::write(store.path(), serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let loaded = store.list_subscriptions().unwrap();
    assert_eq!(loaded.len(), 2);
    let broken = loaded.iter().find(|sub| sub.name == "Broken").unwrap();
    assert_eq!(broken.next_renewal_date, None);

    let summary = SpendingService::new(&store).calculate_for_month(2026, 2).unwrap();
    assert_eq!(summary.item_count(), 1);
    assert!(close(summary.grand_total, 5.0));

    let report = SubscriptionService::new(&store)
        .advance_renewal_dates(date(2026, 6, 1))
        .unwrap();
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.updated[0].id, good.id);
}

#[test]
fn unreadable_store_surfaces_storage_error() {
    let (store, _guard) = setup_store();
    fs::write(store.path(), "{ not json").unwrap();
    assert!(store.list_subscriptions().is_err());
}

#[test]
fn numeric_renewal_date_does_not_block_loading() {
    let (store, _guard) = setup_store();
    let good = Subscription::new("Good", 5.0, "USD", BillingCycle::Monthly, date(2026, 1, 5));
    let odd = Subscription::new("Odd", 7.0, "USD", BillingCycle::Yearly, date(2026, 3, 1));
    store.insert_subscription(&good).unwrap();
    store.insert_subscription(&odd).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for record in value["subscriptions"].as_array_mut().unwrap() {
        if record["name"] == "Odd" {
            record["next_renewal_date"] = serde_json::json!(20260301);
        }
    }
    fs::write(store.path(), serde_json::to_string_pretty(&value).unwrap()).unwrap();

    let loaded = store.list_subscriptions().unwrap();
    assert_eq!(loaded.len(), 2);
    let odd = loaded.iter().find(|sub| sub.name == "Odd").unwrap();
    assert_eq!(odd.next_renewal_date, None);
    let good = loaded.iter().find(|sub| sub.name == "Good").unwrap();
    assert_eq!(good.next_renewal_date, Some(date(2026, 1, 5)));
}
