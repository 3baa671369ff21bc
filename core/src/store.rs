use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;

/// A complaint log category. Each category is backed by its own JSON-array
/// file; insertion order is significant (oldest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    General,
    Urgent,
    Normal,
    Emergency,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::General,
        LogCategory::Urgent,
        LogCategory::Normal,
        LogCategory::Emergency,
    ];

    /// File names match the original deployment so existing log directories
    /// keep working.
    pub fn file_name(self) -> &'static str {
        match self {
            LogCategory::General => "chat_logs.json",
            LogCategory::Urgent => "urgent_logs.json",
            LogCategory::Normal => "normal_logs.json",
            LogCategory::Emergency => "emergency_logs.json",
        }
    }
}

/// Append-only JSON log store.
///
/// Every append is a read-modify-write of the whole category file: the
/// current array is loaded, the entry pushed, and the full array rewritten
/// through a temp file + rename. Appends are therefore O(current log size),
/// and there is no locking — concurrent appends to the same category race
/// and the last writer wins. Acceptable for low-volume complaint intake;
/// do not put this in front of a high write rate.
#[derive(Debug, Clone)]
pub struct LogStore {
    dir: PathBuf,
}

impl LogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create the log directory and seed any missing category file with an
    /// empty array.
    pub fn init(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        for category in LogCategory::ALL {
            let path = self.path(category);
            if !path.exists() {
                write_atomic(&path, "[]")?;
            }
        }
        Ok(())
    }

    pub fn path(&self, category: LogCategory) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Current entries for a category, oldest first. A missing or corrupt
    /// file reads as empty; only real I/O failures are returned.
    pub fn read(&self, category: LogCategory) -> Result<Vec<Value>, StoreError> {
        load(&self.path(category))
    }

    /// Append one entry to a category's log.
    pub fn append<T: Serialize>(&self, category: LogCategory, entry: &T) -> Result<(), StoreError> {
        let path = self.path(category);
        let mut entries = load(&path)?;
        entries.push(serde_json::to_value(entry)?);
        let body = serde_json::to_string_pretty(&entries)?;
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        write_atomic(&path, &body)
    }
}

fn load(path: &Path) -> Result<Vec<Value>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            warn!(path = %path.display(), %err, "log file is not valid JSON, treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Write through a temp file and rename, so readers never observe a
/// half-written array.
fn write_atomic(path: &Path, body: &str) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}
