//! High score persistence
//!
//! A single scalar record. Native builds keep it in a JSON file, the web
//! build in LocalStorage. Storage trouble never ends a run: reads fall back
//! to 0 and failed writes are logged and skipped.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// On-disk / in-storage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// External collaborator holding the best score across sessions
pub trait HighScoreStore {
    /// Stored high score, `None` when nothing has been saved yet
    fn load(&mut self) -> Result<Option<u64>, StoreError>;
    /// Persist a new record
    fn save(&mut self, high_score: u64) -> Result<(), StoreError>;
}

/// Read the stored high score, degrading to 0 when the store is absent or broken
pub fn load_or_default(store: Option<&mut (dyn HighScoreStore + '_)>) -> u64 {
    let Some(store) = store else {
        log::info!("No high score storage, starting from 0");
        return 0;
    };
    match store.load() {
        Ok(Some(score)) => {
            log::info!("Loaded high score {score}");
            score
        }
        Ok(None) => {
            log::info!("No high score found, starting fresh");
            0
        }
        Err(err) => {
            log::warn!("Could not load high score ({err}), starting from 0");
            0
        }
    }
}

/// JSON file store (native)
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl HighScoreStore for FileStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(Some(record.high_score))
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write-then-rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        log::info!("High score {high_score} saved to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<Cell<Option<u64>>>,
}

impl MemoryStore {
    pub fn with_score(high_score: u64) -> Self {
        Self {
            slot: Rc::new(Cell::new(Some(high_score))),
        }
    }

    pub fn get(&self) -> Option<u64> {
        self.slot.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        Ok(self.slot.get())
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        self.slot.set(Some(high_score));
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "neon_runner_high_score";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let record: HighScoreRecord = serde_json::from_str(&json)?;
                Ok(Some(record.high_score))
            }
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save(&mut self, high_score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&HighScoreRecord { high_score })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("High score {high_score} saved");
        Ok(())
    }
}
