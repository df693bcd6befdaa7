// # File State Store
//
// File-based implementation of StateStore.
//
// ## Purpose
//
// Keeps the retained-client snapshot across runs so that a client that
// briefly disconnects does not lose its DNS record.
//
// ## Durability
//
// - Atomic writes: New state written to a temporary file, then renamed
// - Corruption detection: JSON validated on load; a corrupt file is fatal
//   rather than silently replaced, since starting empty would delete the
//   records of every client currently inside its grace window
// - Missing file: treated as an empty state (first run)

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::{RetainedState, StateStore};

/// File-based state store
///
/// # Example
///
/// ```rust,no_run
/// use unifi_dns_core::state::FileStateStore;
/// use unifi_dns_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/unifi-sync/state.json");
///
///     let state = store.load().await?;
///     store.persist(&state).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store backed by the given file
    ///
    /// Nothing is touched on disk until `load` or `persist` is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a store using `state.json` inside a directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(crate::config::STATE_FILE_NAME))
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    async fn ensure_parent_dir(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !fs::try_exists(parent).await.unwrap_or(false)
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<RetainedState, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("State file does not exist: {}", self.path.display());
                return Ok(RetainedState::new());
            }
            Err(e) => {
                return Err(Error::state_store(format!(
                    "Failed to read state file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let state: RetainedState = serde_json::from_str(&content).map_err(|e| {
            Error::state_corrupt(format!(
                "Failed to parse state file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Loaded state from file: {} clients", state.len());
        Ok(state)
    }

    async fn persist(&self, state: &RetainedState) -> Result<(), Error> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state_store(format!("Failed to serialize state: {}", e)))?;

        // Write to temporary file first
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }
}
