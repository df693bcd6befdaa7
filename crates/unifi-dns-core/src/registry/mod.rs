//! Plugin-based collaborator registry
//!
//! The registry allows DNS providers and inventory sources to be registered
//! dynamically at runtime, avoiding hardcoded match arms in the binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unifi_dns_core::registry::ProviderRegistry;
//! use unifi_dns_core::config::ProviderConfig;
//!
//! let registry = ProviderRegistry::new();
//! unifi_dns_provider_technitium::register(&registry);
//!
//! let config = ProviderConfig::Technitium { ... };
//! let provider = registry.create_provider(&config)?;
//! ```

use crate::config::{InventoryConfig, ProviderConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory, InventorySource, InventorySourceFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Registry mapping type names to collaborator factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: RwLock<HashMap<String, Box<dyn DnsProviderFactory>>>,

    /// Registered inventory source factories
    inventory_sources: RwLock<HashMap<String, Box<dyn InventorySourceFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory under a type name (e.g., "technitium")
    pub fn register_provider(&self, name: impl Into<String>, factory: Box<dyn DnsProviderFactory>) {
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name.into(), factory);
    }

    /// Register an inventory source factory under a type name (e.g., "unifi")
    pub fn register_inventory_source(
        &self,
        name: impl Into<String>,
        factory: Box<dyn InventorySourceFactory>,
    ) {
        let mut sources = self
            .inventory_sources
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sources.insert(name.into(), factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error::Config)`: Provider type is not registered
    /// - `Err(Error)`: The factory rejected the configuration
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        let provider_type = config.type_name();
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider: {}", provider_type)))?;

        factory.create(config)
    }

    /// Create an inventory source from configuration
    pub fn create_inventory_source(
        &self,
        config: &InventoryConfig,
    ) -> Result<Box<dyn InventorySource>> {
        let source_type = config.type_name();
        let sources = self
            .inventory_sources
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let factory = sources.get(source_type).ok_or_else(|| {
            Error::config(format!("Unknown inventory source: {}", source_type))
        })?;

        factory.create(config)
    }

    /// List all registered provider types, sorted
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }

    /// Check if an inventory source type is registered
    pub fn has_inventory_source(&self, name: &str) -> bool {
        let sources = self
            .inventory_sources
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        sources.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockProviderFactory;

    impl DnsProviderFactory for MockProviderFactory {
        fn create(&self, _config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
            Err(Error::not_found("Mock provider not implemented"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = ProviderRegistry::new();

        assert!(!registry.has_provider("mock"));

        registry.register_provider("mock", Box::new(MockProviderFactory));

        assert!(registry.has_provider("mock"));
        assert_eq!(registry.list_providers(), vec!["mock".to_string()]);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::new();
        let config = ProviderConfig::Technitium {
            api_url: "http://dns:5380".to_string(),
            api_token: "token".to_string(),
            dry_run: false,
        };

        let err = registry.create_provider(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("technitium"));
    }

    #[test]
    fn test_unknown_inventory_source_is_config_error() {
        let registry = ProviderRegistry::new();
        let config = InventoryConfig::unifi("https://unifi", "key", "default");

        assert!(!registry.has_inventory_source("unifi"));
        let err = registry.create_inventory_source(&config).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
