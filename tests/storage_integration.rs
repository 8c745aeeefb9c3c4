//! Integration tests for the visitor store
//!
//! Everything runs against in-memory SQLite through the Storage trait, the
//! same seam the HTTP layer uses.

use std::sync::Arc;
use vantage::models::GeoLocation;
use vantage::storage::{SqliteStorage, Storage};

async fn create_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn san_francisco() -> GeoLocation {
    GeoLocation {
        latitude: 37.7749,
        longitude: -122.4194,
        city: "San Francisco".to_string(),
        country: "United States".to_string(),
    }
}

fn berlin() -> GeoLocation {
    GeoLocation {
        latitude: 52.52,
        longitude: 13.405,
        city: "Berlin".to_string(),
        country: "Germany".to_string(),
    }
}

#[tokio::test]
async fn record_visit_is_idempotent_per_ip() {
    let storage = create_storage().await;

    storage.record_visit("1.1.1.1", &san_francisco()).await.unwrap();
    // A returning visitor never refreshes the stored coordinates
    storage.record_visit("1.1.1.1", &berlin()).await.unwrap();

    let visitors = storage.list_visitors().await.unwrap();
    assert_eq!(visitors.len(), 1);
    assert_eq!(visitors[0].ip, "1.1.1.1");
    assert_eq!(visitors[0].city, "San Francisco");
    assert_eq!(visitors[0].latitude, 37.7749);
}

#[tokio::test]
async fn count_unique_matches_distinct_ips() {
    let storage = create_storage().await;

    storage.record_visit("1.1.1.1", &san_francisco()).await.unwrap();
    storage.record_visit("2.2.2.2", &berlin()).await.unwrap();
    storage.record_visit("1.1.1.1", &san_francisco()).await.unwrap();
    storage.record_visit("3.3.3.3", &berlin()).await.unwrap();

    assert_eq!(storage.count_unique().await.unwrap(), 3);
}

#[tokio::test]
async fn count_returning_is_always_zero() {
    // count(ip) - count(distinct ip) over a table keyed by ip can never be
    // anything but zero; the assertion documents the degenerate metric.
    let storage = create_storage().await;

    assert_eq!(storage.count_returning().await.unwrap(), 0);

    for ip in ["1.1.1.1", "2.2.2.2", "1.1.1.1", "1.1.1.1", "3.3.3.3"] {
        storage.record_visit(ip, &san_francisco()).await.unwrap();
    }

    assert_eq!(storage.count_returning().await.unwrap(), 0);
}

#[tokio::test]
async fn count_by_country_groups_rows() {
    let storage = create_storage().await;

    storage.record_visit("1.1.1.1", &san_francisco()).await.unwrap();
    storage.record_visit("2.2.2.2", &san_francisco()).await.unwrap();
    storage.record_visit("3.3.3.3", &berlin()).await.unwrap();

    let counts = storage.count_by_country().await.unwrap();
    assert_eq!(counts.len(), 2);

    let us = counts.iter().find(|c| c.country == "United States").unwrap();
    assert_eq!(us.count, 2);
    let de = counts.iter().find(|c| c.country == "Germany").unwrap();
    assert_eq!(de.count, 1);
}

#[tokio::test]
async fn count_by_day_groups_by_insert_date() {
    let storage = create_storage().await;

    storage.record_visit("1.1.1.1", &san_francisco()).await.unwrap();
    storage.record_visit("2.2.2.2", &berlin()).await.unwrap();

    let counts = storage.count_by_day().await.unwrap();
    assert_eq!(counts.len(), 1);

    // CURRENT_TIMESTAMP is UTC
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(counts[0].date, today);
    assert_eq!(counts[0].count, 2);
}

#[tokio::test]
async fn concurrent_inserts_of_same_ip_leave_one_row() {
    let storage = create_storage().await;

    let mut handles = vec![];
    for _ in 0..10 {
        let storage = Arc::clone(&storage);
        handles.push(tokio::spawn(async move {
            storage.record_visit("1.1.1.1", &san_francisco()).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(storage.count_unique().await.unwrap(), 1);
    assert_eq!(storage.list_visitors().await.unwrap().len(), 1);
}
