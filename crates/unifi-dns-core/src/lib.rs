// # unifi-dns-core
//
// Reconciliation engine that keeps DNS A records in step with the clients a
// LAN controller reports.
//
// ## Architecture Overview
//
// This library provides the core functionality:
// - **InventorySource**: Trait for listing the controller's current clients
// - **DnsProvider**: Trait for reading and mutating records in the zone
// - **StateStore**: Trait for the retained-client snapshot kept between runs
// - **SyncEngine**: Runs one reconciliation pass over the three
// - **ProviderRegistry**: Plugin-based registry for collaborators
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic is separate from I/O
// 2. **One Pass Per Process**: Scheduling belongs to cron or a timer
// 3. **Fail Before Mutating**: Every read step completes before any write
// 4. **Grace Window**: Briefly disconnected clients keep their records
// 5. **Determinism**: Same inputs produce the same changes in the same order

pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{InventoryConfig, ProviderConfig, SyncConfig};
pub use engine::{ChangeSet, SyncEngine, SyncPlan, SyncResult};
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use state::{FileStateStore, MemoryStateStore};
pub use traits::{DnsProvider, InventorySource, StateStore};
