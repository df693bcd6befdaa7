// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Provides a state store that doesn't persist across restarts. Useful for
// tests and for embedding the engine where the caller owns persistence.
//
// ## Crash Behavior
//
// - All state is lost on restart
// - The first pass after a restart has no grace window: every client that
//   is not currently online loses its record

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{RetainedState, StateStore};

/// In-memory state store implementation
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<RetainedState>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a state
    pub fn with_state(state: RetainedState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Snapshot of the currently stored state
    pub async fn snapshot(&self) -> RetainedState {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<RetainedState, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn persist(&self, state: &RetainedState) -> Result<(), Error> {
        *self.inner.write().await = state.clone();
        Ok(())
    }
}
