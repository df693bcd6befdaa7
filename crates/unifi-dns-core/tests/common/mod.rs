//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles record every provider call in order so tests can assert on
//! both what was changed and when.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use unifi_dns_core::config::SyncConfig;
use unifi_dns_core::error::{Error, Result};
use unifi_dns_core::traits::{
    DnsProvider, DnsRecord, InventorySource, NetworkClient, RetainedState, StateStore, Zone,
};

pub const ZONE: &str = "home.lan";

/// A provider call as observed by [`RecordingDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    GetZone(String),
    ListRecords(String),
    Upsert { name: String, ip: String },
    Delete { name: String, ip: String },
}

impl ProviderCall {
    pub fn is_mutation(&self) -> bool {
        matches!(self, ProviderCall::Upsert { .. } | ProviderCall::Delete { .. })
    }
}

#[derive(Default)]
struct ProviderInner {
    records: Vec<DnsRecord>,
    calls: Vec<ProviderCall>,
}

/// An in-memory DNS provider that records calls and applies mutations
///
/// Clones share the same records and call log.
#[derive(Clone, Default)]
pub struct RecordingDnsProvider {
    inner: Arc<Mutex<ProviderInner>>,
    zone_missing: bool,
    list_fails: bool,
    failing_names: Arc<HashSet<String>>,
}

impl RecordingDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the zone with existing records
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::new();
        provider.inner.lock().unwrap().records = records;
        provider
    }

    /// Make `get_zone` report the zone as missing
    pub fn zone_missing(mut self) -> Self {
        self.zone_missing = true;
        self
    }

    /// Make `list_records` fail
    pub fn list_fails(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// Make upserts and deletes of these record names fail
    pub fn failing_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_names = Arc::new(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(ProviderCall::is_mutation).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Current A records as (name, ip), sorted
    pub fn a_records(&self) -> Vec<(String, String)> {
        let mut records: Vec<(String, String)> = self
            .inner
            .lock()
            .unwrap()
            .records
            .iter()
            .filter(|r| r.record_type.as_str() == "A")
            .map(|r| (r.name.clone(), r.ip().unwrap_or_default().to_string()))
            .collect();
        records.sort();
        records
    }
}

#[async_trait]
impl DnsProvider for RecordingDnsProvider {
    async fn get_zone(&self, zone: &str) -> Result<Zone> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .push(ProviderCall::GetZone(zone.to_string()));
        if self.zone_missing {
            return Err(Error::zone_not_found(zone));
        }
        Ok(Zone {
            name: zone.to_string(),
        })
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProviderCall::ListRecords(zone.to_string()));
        if self.list_fails {
            return Err(Error::http("connection refused"));
        }
        Ok(inner.records.clone())
    }

    async fn upsert_record(&self, _zone: &str, record: &DnsRecord) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProviderCall::Upsert {
            name: record.name.clone(),
            ip: record.ip().unwrap_or_default().to_string(),
        });
        if self.failing_names.contains(&record.name) {
            return Err(Error::provider("recording", "upsert rejected"));
        }
        inner
            .records
            .retain(|r| !(r.name == record.name && r.record_type == record.record_type));
        inner.records.push(record.clone());
        Ok(())
    }

    async fn delete_record(&self, _zone: &str, record: &DnsRecord) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(ProviderCall::Delete {
            name: record.name.clone(),
            ip: record.ip().unwrap_or_default().to_string(),
        });
        if self.failing_names.contains(&record.name) {
            return Err(Error::provider("recording", "delete rejected"));
        }
        inner.records.retain(|r| {
            !(r.name == record.name
                && r.record_type == record.record_type
                && r.ip_address == record.ip_address)
        });
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// An inventory source returning a fixed, swappable client list
#[derive(Clone, Default)]
pub struct StaticInventory {
    clients: Arc<Mutex<Vec<NetworkClient>>>,
}

impl StaticInventory {
    pub fn new(clients: Vec<NetworkClient>) -> Self {
        Self {
            clients: Arc::new(Mutex::new(clients)),
        }
    }

    /// Replace the clients returned by subsequent passes
    pub fn set(&self, clients: Vec<NetworkClient>) {
        *self.clients.lock().unwrap() = clients;
    }
}

#[async_trait]
impl InventorySource for StaticInventory {
    async fn list_clients(&self) -> Result<Vec<NetworkClient>> {
        Ok(self.clients.lock().unwrap().clone())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// An inventory source that always fails
pub struct FailingInventory;

#[async_trait]
impl InventorySource for FailingInventory {
    async fn list_clients(&self) -> Result<Vec<NetworkClient>> {
        Err(Error::http("controller unreachable"))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A state store whose load succeeds and whose persist always fails
pub struct ReadOnlyStateStore {
    state: RetainedState,
}

impl ReadOnlyStateStore {
    pub fn new(state: RetainedState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl StateStore for ReadOnlyStateStore {
    async fn load(&self) -> Result<RetainedState> {
        Ok(self.state.clone())
    }

    async fn persist(&self, _state: &RetainedState) -> Result<()> {
        Err(Error::state_store("read-only filesystem"))
    }
}

pub fn client(name: &str, mac: &str, ip: &str) -> NetworkClient {
    NetworkClient::new(mac, name, mac, ip)
}

pub fn a_record(name: &str, ip: &str) -> DnsRecord {
    DnsRecord::a(name, ip, 3600, "")
}

/// Fixed reference time for deterministic passes
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 9, 12, 0, 0).unwrap()
}

pub fn test_config(state_dir: &std::path::Path) -> SyncConfig {
    SyncConfig::new(ZONE, state_dir).with_grace_period_secs(3600)
}
