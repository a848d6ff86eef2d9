use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{DataDirLock, DEFAULT_TIMEOUT, LockError};
use crate::model::AppData;

const STATE_FILE: &str = "state.json";

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("{path} is not valid state ({}): {source}", backup_note(.backup))]
    Corrupt {
        path: PathBuf,
        /// `None` when the backup copy could not be written
        backup: Option<PathBuf>,
        source: serde_json::Error,
    },
    #[error("{0}")]
    InvalidFormat(String),
    #[error("could not parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("No data to export")]
    NoData,
    #[error(transparent)]
    Lock(#[from] LockError),
}

fn backup_note(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(path) => format!("backed up as {}", path.display()),
        None => "no backup written".to_string(),
    }
}

/// Get the user's home directory
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Resolve the data directory: explicit override, `STACKTREE_DATA_DIR`, the config value,
/// then `$XDG_DATA_HOME/stacktree` or `~/.local/share/stacktree`.
pub fn resolve_data_dir(flag: Option<&Path>, config_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var("STACKTREE_DATA_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    if let Some(dir) = config_dir {
        return PathBuf::from(dir);
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("stacktree")
}

/// Write a file atomically: temp file in the same directory, then rename over the target
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Validate and decode an exported document. Requires a `parentTask` object holding a
/// `subStacks` array; `logs` and `stash` may be absent.
pub fn parse_import(json: &str) -> Result<AppData, StoreError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let has_stacks = value
        .get("parentTask")
        .and_then(|p| p.get("subStacks"))
        .is_some_and(|s| s.is_array());
    if !has_stacks {
        return Err(StoreError::InvalidFormat("Invalid data format".to_string()));
    }
    let mut data: AppData = serde_json::from_value(value)?;
    data.normalize();
    Ok(data)
}

/// JSON-file persistence for [`AppData`], one file per data directory
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (creating if needed) the store in `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::WriteError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(Store { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    /// Hold the data directory lock
    pub fn lock(&self) -> Result<DataDirLock, StoreError> {
        Ok(DataDirLock::acquire(&self.dir, DEFAULT_TIMEOUT)?)
    }

    /// Load saved state. `Ok(None)` when nothing has been saved yet.
    /// A malformed file is backed up as `state.json.bak` before the error is returned.
    pub fn load(&self) -> Result<Option<AppData>, StoreError> {
        let path = self.state_path();
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::ReadError { path, source: e }),
        };
        match serde_json::from_str::<AppData>(&content) {
            Ok(mut data) => {
                data.normalize();
                tracing::debug!(path = %path.display(), stacks = data.parent_task.sub_stacks.len(), "loaded state");
                Ok(Some(data))
            }
            Err(source) => {
                let backup_path = path.with_extension("json.bak");
                let backup = match fs::copy(&path, &backup_path) {
                    Ok(_) => {
                        tracing::warn!(path = %path.display(), backup = %backup_path.display(), error = %source, "state file is corrupt");
                        Some(backup_path)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %source, backup_error = %e, "state file is corrupt and could not be backed up");
                        None
                    }
                };
                Err(StoreError::Corrupt {
                    path,
                    backup,
                    source,
                })
            }
        }
    }

    /// Persist state (pretty JSON, atomic replace) under the directory lock
    pub fn save(&self, data: &AppData) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        self.save_locked(data)
    }

    /// Persist state when the caller already holds [`Store::lock`]
    pub fn save_locked(&self, data: &AppData) -> Result<(), StoreError> {
        let path = self.state_path();
        let content = serde_json::to_string_pretty(data)?;
        atomic_write(&path, content.as_bytes()).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "state write failed");
            StoreError::WriteError {
                path: path.clone(),
                source: e,
            }
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "saved state");
        Ok(())
    }

    /// Delete all saved state
    pub fn clear(&self) -> Result<(), StoreError> {
        let _lock = self.lock()?;
        let path = self.state_path();
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::WriteError { path, source: e }),
        }
        tracing::info!(path = %path.display(), "cleared state");
        Ok(())
    }

    /// Export what is on disk as pretty JSON
    pub fn export_json(&self) -> Result<String, StoreError> {
        let data = self.load()?.ok_or(StoreError::NoData)?;
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Validate an exported document, replace the saved state with it, and return it
    pub fn import_json(&self, json: &str) -> Result<AppData, StoreError> {
        let data = parse_import(json)?;
        self.save(&data)?;
        tracing::info!(
            stacks = data.parent_task.sub_stacks.len(),
            logs = data.logs.len(),
            stash = data.stash.len(),
            "imported state"
        );
        Ok(data)
    }
}
