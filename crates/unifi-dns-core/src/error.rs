//! Error types for the sync engine
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the sync engine
///
/// The first group of variants are the fatal outcomes of a reconciliation
/// pass. Every one of them aborts the pass before any record is mutated.
/// The remaining variants are raised by collaborators and get wrapped into
/// one of the fatal kinds by [`SyncEngine`](crate::SyncEngine).
#[derive(Error, Debug)]
pub enum Error {
    /// Required setting missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The target zone does not exist at the DNS provider
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// The persisted state exists but cannot be parsed
    #[error("State file is corrupt: {0}")]
    StateCorrupt(String),

    /// Listing clients from the inventory source failed
    #[error("Failed to fetch client inventory: {0}")]
    InventoryFetch(String),

    /// Listing records from the DNS provider failed
    #[error("Failed to fetch DNS records: {0}")]
    RecordFetch(String),

    /// State store I/O errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors (from collaborator APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a "zone not found" error
    pub fn zone_not_found(zone: impl Into<String>) -> Self {
        Self::ZoneNotFound(zone.into())
    }

    /// Create a corrupt state error
    pub fn state_corrupt(msg: impl Into<String>) -> Self {
        Self::StateCorrupt(msg.into())
    }

    /// Create an inventory fetch error
    pub fn inventory_fetch(msg: impl Into<String>) -> Self {
        Self::InventoryFetch(msg.into())
    }

    /// Create a record fetch error
    pub fn record_fetch(msg: impl Into<String>) -> Self {
        Self::RecordFetch(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}
