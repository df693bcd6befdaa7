//! Core reconciliation engine
//!
//! The SyncEngine runs one reconciliation pass:
//! - Validates the target zone exists
//! - Loads the retained client state
//! - Merges in the clients the controller currently reports
//! - Derives the records that should exist and diffs them against the zone
//! - Applies deletes, then upserts
//! - Persists the updated state
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   clients    ┌──────────────┐   records    ┌─────────────┐
//! │ InventorySource │─────────────▶│  SyncEngine  │◀────────────▶│ DnsProvider │
//! └─────────────────┘              └──────────────┘              └─────────────┘
//!                                          │
//!                                          ▼
//!                                  ┌──────────────┐
//!                                  │  StateStore  │
//!                                  │ (load/save)  │
//!                                  └──────────────┘
//! ```
//!
//! ## Failure Model
//!
//! Every read step (zone lookup, state load, inventory, record listing) is
//! fatal and aborts the pass before any record is touched. Individual
//! record operations only count as failures. A failed state write is logged
//! and the pass still reports its counts.

pub mod apply;
pub mod desired;
pub mod diff;
pub mod reconcile;
pub mod sanitize;

pub use apply::{SyncResult, apply_changes};
pub use desired::{DEFAULT_RECORD_TTL, DesiredRecordSet, build_desired_records, record_name};
pub use diff::{ChangeSet, calculate_changes, filter_records_by_type, needs_upsert};
pub use reconcile::update_state;
pub use sanitize::sanitize_label;

use crate::config::SyncConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, InventorySource, RecordType, RetainedState, StateStore};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

/// The outcome of the read-only half of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    /// Retained state after merging observed clients
    pub state: RetainedState,
    /// Changes needed to bring the zone in line with `state`
    pub changes: ChangeSet,
}

/// Core reconciliation engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Call [`SyncEngine::run()`] once
/// 3. Drop
///
/// A process performs exactly one pass; scheduling repeated passes is left
/// to an external scheduler such as cron or a systemd timer.
///
/// ## Threading
///
/// All steps run sequentially. At most one engine may run against a given
/// state store at a time.
pub struct SyncEngine {
    /// Source of currently connected clients
    inventory: Box<dyn InventorySource>,

    /// DNS provider holding the zone
    provider: Box<dyn DnsProvider>,

    /// Retained client state
    state_store: Box<dyn StateStore>,

    /// Pass configuration
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Returns
    ///
    /// - `Ok(SyncEngine)`: Ready to run
    /// - `Err(Error::Config)`: The configuration failed validation
    pub fn new(
        inventory: Box<dyn InventorySource>,
        provider: Box<dyn DnsProvider>,
        state_store: Box<dyn StateStore>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            inventory,
            provider,
            state_store,
            config,
        })
    }

    /// Pass configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run one reconciliation pass using the current time
    pub async fn run(&self) -> Result<SyncResult> {
        self.run_at(Utc::now()).await
    }

    /// Run one reconciliation pass as of `now`
    ///
    /// # Returns
    ///
    /// - `Ok(SyncResult)`: The pass completed; per-record failures are
    ///   reported in the counts
    /// - `Err(Error)`: A read step failed and nothing was changed
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SyncResult> {
        let plan = self.plan_at(now).await?;

        info!(
            adds = plan.changes.add.len(),
            deletes = plan.changes.delete.len(),
            "Applying changes"
        );
        let result = apply_changes(self.provider.as_ref(), &self.config.zone, &plan.changes).await;

        if let Err(e) = self.state_store.persist(&plan.state).await {
            error!(error = %e, "Failed to persist state");
        }

        info!(
            records_upserted = result.add_success,
            records_upsert_failed = result.add_failed,
            records_deleted = result.delete_success,
            records_delete_failed = result.delete_failed,
            "Sync pass finished"
        );

        Ok(result)
    }

    /// Compute the next state and the required changes without mutating
    /// anything
    pub async fn plan_at(&self, now: DateTime<Utc>) -> Result<SyncPlan> {
        let zone = &self.config.zone;

        self.provider.get_zone(zone).await.map_err(|e| match e {
            Error::ZoneNotFound(_) | Error::NotFound(_) => Error::zone_not_found(zone.clone()),
            other => Error::zone_not_found(format!("{zone}: {other}")),
        })?;
        debug!(zone = %zone, provider = self.provider.provider_name(), "Zone exists");

        let retained = self.state_store.load().await?;

        let observed = self.inventory.list_clients().await.map_err(|e| {
            Error::inventory_fetch(format!("{}: {}", self.inventory.source_name(), e))
        })?;
        info!(
            observed = observed.len(),
            retained = retained.len(),
            "Fetched client inventory"
        );

        let state = update_state(retained, &observed, now, self.config.grace_period());

        let records = self.provider.list_records(zone).await.map_err(|e| {
            Error::record_fetch(format!("{}: {}", self.provider.provider_name(), e))
        })?;
        let actual = filter_records_by_type(records, &RecordType::A);
        debug!(existing = actual.len(), "Fetched existing A records");

        let desired = build_desired_records(&state, zone);
        let changes = calculate_changes(&actual, desired);

        Ok(SyncPlan { state, changes })
    }
}
