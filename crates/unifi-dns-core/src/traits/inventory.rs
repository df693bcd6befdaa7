// # Inventory Source Trait
//
// Defines the interface for listing the clients a LAN controller currently
// knows about.
//
// ## Implementations
//
// - UniFi Network Integration API: `unifi-dns-source-unifi` crate

use async_trait::async_trait;

/// A client as reported by the inventory source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkClient {
    /// Controller-specific identifier
    pub id: String,
    /// Display name (free text, sanitized before use in DNS)
    pub name: String,
    /// MAC address, the identity of a client
    pub mac_address: String,
    /// Current IPv4 address; may be empty if the controller has none
    pub ip_address: String,
}

impl NetworkClient {
    /// Create a new network client
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mac_address: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mac_address: mac_address.into(),
            ip_address: ip_address.into(),
        }
    }
}

/// Trait for inventory source implementations
///
/// # Completeness
///
/// `list_clients()` must return the complete set for one call. Sources
/// backed by a paginated API page internally until the listing is
/// exhausted. A failure on any page fails the whole call; a partial list
/// would make the engine delete records for clients that are still online.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// List all clients currently known to the controller
    async fn list_clients(&self) -> Result<Vec<NetworkClient>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}

/// Helper trait for constructing inventory sources from configuration
pub trait InventorySourceFactory: Send + Sync {
    /// Create an InventorySource instance from configuration
    fn create(
        &self,
        config: &crate::config::InventoryConfig,
    ) -> Result<Box<dyn InventorySource>, crate::Error>;
}
