//! Change application against the DNS provider

use serde::Serialize;
use tracing::{debug, error};

use super::diff::ChangeSet;
use crate::traits::DnsProvider;

/// Outcome counts of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    /// Records successfully upserted
    pub add_success: usize,
    /// Records whose upsert failed
    pub add_failed: usize,
    /// Records successfully deleted
    pub delete_success: usize,
    /// Records whose delete failed
    pub delete_failed: usize,
}

impl SyncResult {
    /// Total failed operations
    pub fn total_failed(&self) -> usize {
        self.add_failed + self.delete_failed
    }

    /// Whether every attempted operation succeeded
    pub fn is_clean(&self) -> bool {
        self.total_failed() == 0
    }
}

/// Execute a change set against the provider
///
/// All deletes run before any add, so a record being replaced is gone
/// before its successor is written. Every operation is attempted; a failure
/// is logged and counted but never stops the rest of the batch.
pub async fn apply_changes(provider: &dyn DnsProvider, zone: &str, changes: &ChangeSet) -> SyncResult {
    let mut result = SyncResult::default();

    for record in &changes.delete {
        match provider.delete_record(zone, record).await {
            Ok(()) => {
                result.delete_success += 1;
                debug!(record = %record.name, "Deleted record");
            }
            Err(e) => {
                result.delete_failed += 1;
                error!(record = %record.name, error = %e, "Error deleting record");
            }
        }
    }

    for record in &changes.add {
        match provider.upsert_record(zone, record).await {
            Ok(()) => {
                result.add_success += 1;
                debug!(
                    record = %record.name,
                    ip = record.ip().unwrap_or_default(),
                    "Upserted record"
                );
            }
            Err(e) => {
                result.add_failed += 1;
                error!(record = %record.name, error = %e, "Error upserting record");
            }
        }
    }

    result
}
