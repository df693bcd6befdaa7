//! Merging observed clients into the retained state

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::traits::{Client, NetworkClient, RetainedState};

/// Merge freshly observed clients with the retained ones
///
/// Every observed client is inserted (or overwritten) by MAC address with
/// `last_seen = now`. A retained client that was not observed is kept only
/// while `now - last_seen <= grace_period`; once the grace period is
/// exceeded it is dropped, and its record becomes eligible for deletion.
///
/// Observed clients without a MAC address have no identity and are skipped.
pub fn update_state(
    retained: RetainedState,
    observed: &[NetworkClient],
    now: DateTime<Utc>,
    grace_period: Duration,
) -> RetainedState {
    let mut next = RetainedState::new();

    for client in observed {
        if client.mac_address.is_empty() {
            warn!(client_id = %client.id, name = %client.name, "Skipping client without MAC address");
            continue;
        }

        next.insert(Client {
            name: client.name.clone(),
            mac_address: client.mac_address.clone(),
            ip_address: client.ip_address.clone(),
            last_seen: now,
        });
    }

    let observed_count = next.len();
    let mut expired = 0usize;

    for client in retained.into_clients() {
        if next.contains(&client.mac_address) {
            continue;
        }

        if now.signed_duration_since(client.last_seen) > grace_period {
            debug!(
                mac = %client.mac_address,
                name = %client.name,
                last_seen = %client.last_seen,
                "Dropping client past grace period"
            );
            expired += 1;
            continue;
        }

        next.insert(client);
    }

    debug!(
        observed = observed_count,
        retained = next.len() - observed_count,
        expired,
        "Updated client state"
    );

    next
}
