//! Desired record derivation

use std::collections::BTreeMap;
use tracing::warn;

use super::sanitize::sanitize_label;
use crate::traits::{DnsRecord, RetainedState};

/// TTL for every managed record (in seconds)
pub const DEFAULT_RECORD_TTL: u32 = 3600;

/// Records that should exist, keyed by fully qualified name
pub type DesiredRecordSet = BTreeMap<String, DnsRecord>;

/// Fully qualified record name for a client display name
///
/// Returns `None` when the display name sanitizes to an empty label.
pub fn record_name(client_name: &str, zone: &str) -> Option<String> {
    let label = sanitize_label(client_name);
    if label.is_empty() {
        return None;
    }
    Some(format!("{label}.{zone}"))
}

/// Map tracked clients to the A records that should exist for them
///
/// Each client yields `{sanitize(name)}.{zone}` pointing at its address,
/// with the MAC address as comment. Clients are visited in ascending MAC
/// order; when two clients sanitize to the same name, the later one wins.
/// Clients whose name sanitizes to an empty label get no record.
pub fn build_desired_records(state: &RetainedState, zone: &str) -> DesiredRecordSet {
    let mut desired = DesiredRecordSet::new();

    for client in state.clients() {
        let Some(name) = record_name(&client.name, zone) else {
            warn!(
                mac = %client.mac_address,
                name = %client.name,
                "Client name has no usable characters, skipping record"
            );
            continue;
        };

        let record = DnsRecord::a(
            name.clone(),
            client.ip_address.clone(),
            DEFAULT_RECORD_TTL,
            client.mac_address.clone(),
        );

        if let Some(previous) = desired.insert(name, record) {
            warn!(
                record = %previous.name,
                replaced_mac = %previous.comments,
                mac = %client.mac_address,
                "Record name collision, later client wins"
            );
        }
    }

    desired
}
