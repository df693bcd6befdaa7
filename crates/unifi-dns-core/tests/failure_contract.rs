//! Contract Test: Failure Isolation
//!
//! Constraints verified:
//! - Read-step failures abort the pass before any record is touched
//! - A failing record operation does not stop the rest of the batch
//! - A failed state write does not fail the pass

mod common;

use common::*;
use unifi_dns_core::traits::{Client, RetainedState};
use unifi_dns_core::{Error, FileStateStore, MemoryStateStore, SyncEngine};

fn build(
    inventory: Box<dyn unifi_dns_core::InventorySource>,
    provider: &RecordingDnsProvider,
    store: Box<dyn unifi_dns_core::StateStore>,
) -> SyncEngine {
    SyncEngine::new(
        inventory,
        Box::new(provider.clone()),
        store,
        test_config(&std::env::temp_dir()),
    )
    .expect("engine construction succeeds")
}

#[tokio::test]
async fn missing_zone_aborts_before_anything_else() {
    let provider = RecordingDnsProvider::new().zone_missing();
    let store = MemoryStateStore::new();
    let engine = build(
        Box::new(StaticInventory::new(vec![client("Laptop", "aa:aa", "10.0.0.2")])),
        &provider,
        Box::new(store.clone()),
    );

    let err = engine.run_at(t0()).await.unwrap_err();

    assert!(matches!(err, Error::ZoneNotFound(_)));
    assert_eq!(provider.calls(), vec![ProviderCall::GetZone(ZONE.to_string())]);
    assert!(store.snapshot().await.is_empty());
}

#[tokio::test]
async fn inventory_failure_mutates_nothing() {
    let provider = RecordingDnsProvider::with_records(vec![a_record("old.home.lan", "10.0.0.3")]);
    let engine = build(
        Box::new(FailingInventory),
        &provider,
        Box::new(MemoryStateStore::new()),
    );

    let err = engine.run_at(t0()).await.unwrap_err();

    assert!(matches!(err, Error::InventoryFetch(_)));
    assert!(provider.mutations().is_empty());
}

#[tokio::test]
async fn record_listing_failure_mutates_nothing_and_keeps_state() {
    let provider = RecordingDnsProvider::new().list_fails();
    let store = MemoryStateStore::new();
    let engine = build(
        Box::new(StaticInventory::new(vec![client("Laptop", "aa:aa", "10.0.0.2")])),
        &provider,
        Box::new(store.clone()),
    );

    let err = engine.run_at(t0()).await.unwrap_err();

    assert!(matches!(err, Error::RecordFetch(_)));
    assert!(provider.mutations().is_empty());
    assert!(store.snapshot().await.is_empty());
}

#[tokio::test]
async fn corrupt_state_file_aborts_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("state.json"), "{ not json").unwrap();

    let provider = RecordingDnsProvider::new();
    let engine = build(
        Box::new(StaticInventory::new(vec![client("Laptop", "aa:aa", "10.0.0.2")])),
        &provider,
        Box::new(FileStateStore::in_dir(dir.path())),
    );

    let err = engine.run_at(t0()).await.unwrap_err();

    assert!(matches!(err, Error::StateCorrupt(_)));
    assert!(provider.mutations().is_empty());
}

#[tokio::test]
async fn one_failed_upsert_does_not_block_the_others() {
    let provider = RecordingDnsProvider::new().failing_on(["bravo.home.lan"]);
    let store = MemoryStateStore::new();
    let engine = build(
        Box::new(StaticInventory::new(vec![
            client("Alpha", "aa:aa", "10.0.0.1"),
            client("Bravo", "bb:bb", "10.0.0.2"),
            client("Charlie", "cc:cc", "10.0.0.3"),
        ])),
        &provider,
        Box::new(store.clone()),
    );

    let result = engine.run_at(t0()).await.expect("pass still succeeds");

    assert_eq!(result.add_success, 2);
    assert_eq!(result.add_failed, 1);
    assert!(!result.is_clean());
    assert_eq!(provider.mutations().len(), 3);
    assert_eq!(
        provider.a_records(),
        vec![
            ("alpha.home.lan".to_string(), "10.0.0.1".to_string()),
            ("charlie.home.lan".to_string(), "10.0.0.3".to_string()),
        ]
    );
    // State is persisted regardless so the next pass retries the failure
    assert_eq!(store.snapshot().await.len(), 3);
}

#[tokio::test]
async fn failed_delete_is_counted_and_adds_still_run() {
    let provider = RecordingDnsProvider::with_records(vec![a_record("stale.home.lan", "10.0.0.9")])
        .failing_on(["stale.home.lan"]);
    let engine = build(
        Box::new(StaticInventory::new(vec![client("Alpha", "aa:aa", "10.0.0.1")])),
        &provider,
        Box::new(MemoryStateStore::new()),
    );

    let result = engine.run_at(t0()).await.unwrap();

    assert_eq!(result.delete_failed, 1);
    assert_eq!(result.add_success, 1);
    assert_eq!(result.total_failed(), 1);
}

#[tokio::test]
async fn persist_failure_is_not_fatal() {
    let mut retained = RetainedState::new();
    retained.insert(Client {
        name: "Alpha".to_string(),
        mac_address: "aa:aa".to_string(),
        ip_address: "10.0.0.1".to_string(),
        last_seen: t0(),
    });
    let provider = RecordingDnsProvider::new();
    let engine = build(
        Box::new(StaticInventory::new(vec![])),
        &provider,
        Box::new(ReadOnlyStateStore::new(retained)),
    );

    let result = engine.run_at(t0()).await.expect("persist failure is logged only");

    assert_eq!(result.add_success, 1);
}
