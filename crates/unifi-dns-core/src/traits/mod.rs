//! Core traits for the sync engine
//!
//! This module defines the abstract interfaces that collaborators must follow.
//!
//! - [`InventorySource`]: List the clients currently known to the LAN controller
//! - [`DnsProvider`]: Read and mutate records in the authoritative DNS zone
//! - [`StateStore`]: Load and persist the retained-client snapshot between runs

pub mod dns_provider;
pub mod inventory;
pub mod state_store;

pub use dns_provider::{DnsProvider, DnsProviderFactory, DnsRecord, RecordType, Zone};
pub use inventory::{InventorySource, InventorySourceFactory, NetworkClient};
pub use state_store::{Client, RetainedState, StateStore};
