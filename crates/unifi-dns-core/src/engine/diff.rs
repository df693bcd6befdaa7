//! Desired vs. actual record comparison

use super::desired::DesiredRecordSet;
use crate::traits::{DnsRecord, RecordType};

/// Changes required to bring a zone to the desired state
///
/// `add` covers both new names and names whose address changed; providers
/// upsert, so one operation handles both. Both sequences are sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Records to create or overwrite
    pub add: Vec<DnsRecord>,
    /// Records to remove
    pub delete: Vec<DnsRecord>,
}

impl ChangeSet {
    /// Whether there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.delete.is_empty()
    }

    /// Total number of operations
    pub fn len(&self) -> usize {
        self.add.len() + self.delete.len()
    }
}

/// Keep only records of the given type
pub fn filter_records_by_type(records: Vec<DnsRecord>, record_type: &RecordType) -> Vec<DnsRecord> {
    records
        .into_iter()
        .filter(|record| &record.record_type == record_type)
        .collect()
}

/// Whether an existing record must be (re)written to match the desired one
///
/// An address missing on either side always counts as a mismatch.
pub fn needs_upsert(existing: &DnsRecord, desired: &DnsRecord) -> bool {
    match (existing.ip(), desired.ip()) {
        (Some(current), Some(wanted)) => current != wanted,
        _ => true,
    }
}

/// Compute the changes between the provider's records and the desired set
///
/// `actual` must already be restricted to A records of the target zone.
///
/// - An actual record with no desired entry is deleted.
/// - An actual record whose address matches its desired entry removes that
///   entry (nothing to do).
/// - Every desired entry left over is added.
///
/// Actual records are visited in `(name, address)` order, so several records
/// sharing one name resolve the same way on every run.
pub fn calculate_changes(actual: &[DnsRecord], mut desired: DesiredRecordSet) -> ChangeSet {
    let mut existing: Vec<&DnsRecord> = actual.iter().collect();
    existing.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.ip().cmp(&b.ip())));

    let mut delete = Vec::new();

    for record in existing {
        match desired.get(&record.name) {
            None => delete.push(record.clone()),
            Some(wanted) if needs_upsert(record, wanted) => {}
            Some(_) => {
                tracing::debug!(record = %record.name, "Record is up to date");
                desired.remove(&record.name);
            }
        }
    }

    ChangeSet {
        add: desired.into_values().collect(),
        delete,
    }
}
