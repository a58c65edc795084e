use crate::error::{QuizError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const STORE_VERSION: u32 = 1;

/// Everything a later run needs to resume: both columns and all four counter arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    #[serde(default = "default_version")]
    pub version: u32,
    pub items_a: Vec<String>,
    pub items_b: Vec<String>,
    pub corrects_forward: Vec<u32>,
    pub incorrects_forward: Vec<u32>,
    pub corrects_reverse: Vec<u32>,
    pub incorrects_reverse: Vec<u32>,
    pub max_questions: usize,
    #[serde(default)]
    pub saved_at: Option<DateTime<Local>>,
}

fn default_version() -> u32 {
    STORE_VERSION
}

impl PersistedSession {
    /// Length of the item columns
    pub fn len(&self) -> usize {
        self.items_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_a.is_empty()
    }
}

/// Load/store contract for the persisted session bundle
pub trait SessionStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<PersistedSession>>;
    /// Replace the stored bundle; a failed save leaves the previous one intact
    fn save(&self, session: &PersistedSession) -> Result<()>;
    fn discard(&self) -> Result<()>;
    fn exists(&self) -> bool;
}

/// JSON file at a single well-known path, written via temp file + rename
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fill a temp file next to the target with `write`, then rename it over
    /// the target. The target is untouched unless every step succeeds.
    fn replace_with(
        &self,
        write: impl FnOnce(&mut File) -> std::io::Result<()>,
    ) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| self.persist_failure(e))?;

        // temp file lives next to the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| self.persist_failure(e))?;
        write(tmp.as_file_mut()).map_err(|e| self.persist_failure(e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.persist_failure(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.persist_failure(e.error))?;
        Ok(())
    }

    fn persist_failure(&self, source: std::io::Error) -> QuizError {
        QuizError::PersistFailure {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored session");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_slice::<PersistedSession>(&bytes).map_err(|e| {
            QuizError::StoreCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;
        debug!(path = %self.path.display(), items = session.len(), "loaded stored session");
        Ok(Some(session))
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        let data = serde_json::to_vec_pretty(session)
            .map_err(|e| self.persist_failure(std::io::Error::other(e)))?;
        self.replace_with(|file| file.write_all(&data))?;
        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn discard(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "discarded stored session");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// In-memory store for headless runs and tests
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: RefCell<Option<PersistedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: PersistedSession) -> Self {
        Self {
            slot: RefCell::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<()> {
        *self.slot.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn discard(&self) -> Result<()> {
        self.slot.borrow_mut().take();
        Ok(())
    }

    fn exists(&self) -> bool {
        self.slot.borrow().is_some()
    }
}
