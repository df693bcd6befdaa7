// # State Store Trait
//
// Defines the interface for persisting the retained-client snapshot.
//
// ## Purpose
//
// Clients that drop off the controller for a short while keep their DNS
// record for a grace period. The snapshot of recently seen clients is the
// only durable artifact between runs.
//
// ## File Format
//
// ```json
// {
//   "clients": [
//     {
//       "name": "Living Room TV",
//       "macAddress": "aa:bb:cc:dd:ee:ff",
//       "ipAddress": "192.168.1.20",
//       "lastSeen": "2025-01-09T12:00:00Z"
//     }
//   ]
// }
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A client tracked across runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Display name from the controller
    pub name: String,
    /// MAC address (unique key)
    pub mac_address: String,
    /// Last known IPv4 address
    pub ip_address: String,
    /// When the controller last reported this client
    pub last_seen: DateTime<Utc>,
}

/// Retained clients keyed by MAC address
///
/// Backed by an ordered map so that iteration, and everything derived from
/// it, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StateSnapshot", into = "StateSnapshot")]
pub struct RetainedState {
    clients: BTreeMap<String, Client>,
}

/// On-disk shape of [`RetainedState`]
#[derive(Serialize, Deserialize)]
struct StateSnapshot {
    #[serde(default)]
    clients: Vec<Client>,
}

impl From<StateSnapshot> for RetainedState {
    fn from(snapshot: StateSnapshot) -> Self {
        snapshot.clients.into_iter().collect()
    }
}

impl From<RetainedState> for StateSnapshot {
    fn from(state: RetainedState) -> Self {
        Self {
            clients: state.clients.into_values().collect(),
        }
    }
}

impl FromIterator<Client> for RetainedState {
    fn from_iter<I: IntoIterator<Item = Client>>(iter: I) -> Self {
        let mut state = RetainedState::new();
        for client in iter {
            state.insert(client);
        }
        state
    }
}

impl RetainedState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a client by MAC address
    pub fn insert(&mut self, client: Client) -> Option<Client> {
        self.clients.insert(client.mac_address.clone(), client)
    }

    /// Look up a client by MAC address
    pub fn get(&self, mac_address: &str) -> Option<&Client> {
        self.clients.get(mac_address)
    }

    /// Whether a client with this MAC address is retained
    pub fn contains(&self, mac_address: &str) -> bool {
        self.clients.contains_key(mac_address)
    }

    /// Iterate clients in ascending MAC order
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Consume the state, yielding clients in ascending MAC order
    pub fn into_clients(self) -> impl Iterator<Item = Client> {
        self.clients.into_values()
    }

    /// Number of retained clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no clients are retained
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// Trait for state store implementations
///
/// # Concurrency
///
/// At most one process may run against a given store at a time. Stores do
/// not lock; concurrent passes would race between `load` and `persist`.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the retained state
    ///
    /// # Returns
    ///
    /// - `Ok(RetainedState)`: The persisted state, or an empty one if nothing
    ///   has been persisted yet
    /// - `Err(Error::StateCorrupt)`: An artifact exists but cannot be parsed
    /// - `Err(Error)`: Storage error
    async fn load(&self) -> Result<RetainedState, crate::Error>;

    /// Persist the retained state, replacing whatever was stored before
    ///
    /// A reader must never observe a partially written state.
    async fn persist(&self, state: &RetainedState) -> Result<(), crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client(mac: &str, name: &str) -> Client {
        Client {
            name: name.to_string(),
            mac_address: mac.to_string(),
            ip_address: "10.0.0.1".to_string(),
            last_seen: Utc.with_ymd_and_hms(2025, 1, 9, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_state_keyed_by_mac() {
        let mut state = RetainedState::new();
        state.insert(client("bb", "first"));
        state.insert(client("aa", "second"));
        let previous = state.insert(client("bb", "third"));

        assert_eq!(previous.map(|c| c.name), Some("first".to_string()));
        assert_eq!(state.len(), 2);

        let macs: Vec<_> = state.clients().map(|c| c.mac_address.as_str()).collect();
        assert_eq!(macs, vec!["aa", "bb"]);
    }

    #[test]
    fn test_state_json_shape() {
        let state: RetainedState = vec![client("aa:bb", "TV")].into_iter().collect();
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "clients": [{
                    "name": "TV",
                    "macAddress": "aa:bb",
                    "ipAddress": "10.0.0.1",
                    "lastSeen": "2025-01-09T12:00:00Z"
                }]
            })
        );
    }

    #[test]
    fn test_state_json_missing_clients_is_empty() {
        let state: RetainedState = serde_json::from_str("{}").unwrap();
        assert!(state.is_empty());
    }
}
