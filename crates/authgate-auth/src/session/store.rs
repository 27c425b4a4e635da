//! Single-slot credential stores.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use authgate_core::config::{SessionConfig, StoreBackend};
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::traits::SessionStore;
use authgate_core::types::Credential;

/// Process-local credential slot.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Credential>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, credential: &Credential) -> AppResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(credential.clone());
        Ok(())
    }

    fn load(&self) -> AppResult<Option<Credential>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Ok(slot.clone())
    }

    fn clear(&self) -> AppResult<()> {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
        Ok(())
    }
}

/// Credential slot persisted as a single file.
///
/// Writes go to a sibling temp file that is renamed over the slot, so a
/// reader sees either the old or the new credential.
#[derive(Debug)]
pub struct FileSessionStore {
    /// Path of the slot file.
    path: PathBuf,
    /// Serializes writers sharing the temp file.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the slot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "credential".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, credential: &Credential) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let temp = self.temp_path();
        std::fs::write(&temp, credential.as_str())?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    fn load(&self) -> AppResult<Option<Credential>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let raw = contents.trim();
                if raw.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(raw)))
                }
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Credential removed");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Builds the store selected by configuration.
pub fn store_from_config(config: &SessionConfig) -> Arc<dyn SessionStore> {
    match config.store {
        StoreBackend::Memory => Arc::new(MemorySessionStore::new()),
        StoreBackend::File => Arc::new(FileSessionStore::new(&config.store_path)),
    }
}
