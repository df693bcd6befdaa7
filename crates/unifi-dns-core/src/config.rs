//! Configuration types for the sync engine
//!
//! This module defines all configuration structures used throughout the crate.
//! Loading them (from the environment or anywhere else) is the caller's job;
//! the engine only accepts configurations that pass `validate()`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default grace period for disconnected clients (one hour)
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 3600;

/// Upper bound applied when converting the grace period (ten years)
const MAX_GRACE_PERIOD_SECS: u64 = 10 * 365 * 24 * 3600;

/// Default page size when listing clients from a controller
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Name of the state file inside the state directory
pub const STATE_FILE_NAME: &str = "state.json";

/// Reconciliation pass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Zone that records are created within (e.g., "home.lan")
    pub zone: String,

    /// How long a disconnected client keeps its record (in seconds)
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,

    /// Directory holding the state file
    pub state_dir: PathBuf,
}

impl SyncConfig {
    /// Create a new configuration with the default grace period
    pub fn new(zone: impl Into<String>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            zone: zone.into(),
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
            state_dir: state_dir.into(),
        }
    }

    /// Set the grace period
    pub fn with_grace_period_secs(mut self, secs: u64) -> Self {
        self.grace_period_secs = secs;
        self
    }

    /// The grace period as a signed duration
    pub fn grace_period(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.grace_period_secs.min(MAX_GRACE_PERIOD_SECS) as i64)
    }

    /// Full path of the state file
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE_NAME)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zone.trim().is_empty() {
            return Err(crate::Error::config("Sync zone cannot be empty"));
        }
        if self.grace_period_secs == 0 {
            return Err(crate::Error::config("Grace period must be > 0"));
        }
        if self.state_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("State directory cannot be empty"));
        }
        Ok(())
    }
}

/// Inventory source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryConfig {
    /// UniFi Network Integration API
    Unifi {
        /// Controller base URL (e.g., "https://192.168.1.1")
        api_url: String,
        /// API key sent as `X-API-KEY`
        api_key: String,
        /// Site identifier
        site_id: String,
        /// Clients requested per page
        #[serde(default = "default_page_size")]
        page_size: u32,
        /// Accept self-signed controller certificates
        #[serde(default = "default_accept_invalid_certs")]
        accept_invalid_certs: bool,
    },

    /// Custom inventory source
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl InventoryConfig {
    /// Create a UniFi configuration with default paging and TLS settings
    pub fn unifi(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        site_id: impl Into<String>,
    ) -> Self {
        InventoryConfig::Unifi {
            api_url: api_url.into(),
            api_key: api_key.into(),
            site_id: site_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
            accept_invalid_certs: default_accept_invalid_certs(),
        }
    }

    /// Validate the inventory configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            InventoryConfig::Unifi {
                api_url,
                api_key,
                site_id,
                page_size,
                ..
            } => {
                if api_url.is_empty() {
                    return Err(crate::Error::config("UniFi API URL cannot be empty"));
                }
                if api_key.is_empty() {
                    return Err(crate::Error::config("UniFi API key cannot be empty"));
                }
                if site_id.is_empty() {
                    return Err(crate::Error::config("UniFi site ID cannot be empty"));
                }
                if *page_size == 0 {
                    return Err(crate::Error::config("UniFi page size must be > 0"));
                }
                Ok(())
            }
            InventoryConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom inventory source factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom inventory source config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name
    pub fn type_name(&self) -> &str {
        match self {
            InventoryConfig::Unifi { .. } => "unifi",
            InventoryConfig::Custom { factory, .. } => factory,
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Technitium DNS Server
    Technitium {
        /// Server base URL (e.g., "http://dns.home.lan:5380")
        api_url: String,
        /// API token
        api_token: String,
        /// Log mutations instead of performing them
        #[serde(default)]
        dry_run: bool,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Technitium {
                api_url, api_token, ..
            } => {
                if api_url.is_empty() {
                    return Err(crate::Error::config(
                        "Technitium API URL is required for the technitium provider",
                    ));
                }
                if api_token.is_empty() {
                    return Err(crate::Error::config(
                        "Technitium API token is required for the technitium provider",
                    ));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Technitium { .. } => "technitium",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_accept_invalid_certs() -> bool {
    true
}
