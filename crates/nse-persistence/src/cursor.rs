//! Resume cursor storage.
//!
//! The cursor is the offset of the next unprocessed listing. An absent
//! cursor means 0. The file holds a single decimal integer.

use crate::error::{PersistenceError, PersistenceResult};
use parking_lot::Mutex;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Persistent storage for the resume cursor.
pub trait CursorStore {
    /// Load the stored cursor. `None` if nothing has been stored yet.
    fn load(&self) -> PersistenceResult<Option<usize>>;

    /// Overwrite the stored cursor.
    fn save(&self, cursor: usize) -> PersistenceResult<()>;
}

/// Cursor stored as plain text in a file.
///
/// Saves write a sibling temp file and rename it over the target, so a
/// crash never leaves a truncated cursor behind.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cursor file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CursorStore for FileCursorStore {
    fn load(&self) -> PersistenceResult<Option<usize>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cursor file, starting from 0");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!(path = %self.path.display(), "Cursor file is empty, treating as absent");
            return Ok(None);
        }

        trimmed
            .parse::<usize>()
            .map(Some)
            .map_err(|_| PersistenceError::InvalidCursor {
                path: self.path.display().to_string(),
                value: trimmed.to_string(),
            })
    }

    fn save(&self, cursor: usize) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            writeln!(file, "{cursor}")?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), cursor, "Saved cursor");
        Ok(())
    }
}

/// In-memory cursor store.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    value: Mutex<Option<usize>>,
}

impl MemoryCursorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `cursor`.
    pub fn with_cursor(cursor: usize) -> Self {
        Self {
            value: Mutex::new(Some(cursor)),
        }
    }

    /// Current value without going through the trait.
    pub fn get(&self) -> Option<usize> {
        *self.value.lock()
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> PersistenceResult<Option<usize>> {
        Ok(self.get())
    }

    fn save(&self, cursor: usize) -> PersistenceResult<()> {
        *self.value.lock() = Some(cursor);
        Ok(())
    }
}
