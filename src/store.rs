//! File-backed persistence for check batches and the command offset.
//!
//! Both files are rewritten wholesale. A store instance serializes its own
//! writers, but nothing coordinates separate processes: only one watcher
//! process may point at a given log or offset file at a time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::StoreConfig;
use crate::models::CheckBatch;
use crate::utils::error::{AppError, Result};

/// Append-only JSON log of check batches, capped at `max_batches` entries.
pub struct ResultStore {
    path: PathBuf,
    max_batches: usize,
    write_lock: Mutex<()>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>, max_batches: usize) -> Self {
        Self {
            path: path.into(),
            max_batches: max_batches.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.log_file, config.max_batches)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored batch, oldest first. A missing file is an empty log.
    pub fn load_all(&self) -> Result<Vec<CheckBatch>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            AppError::Persistence(format!("Corrupt log {}: {}", self.path.display(), e))
        })
    }

    /// The most recent batch, or `None` when the log is missing or unreadable.
    pub fn load_last_batch(&self) -> Option<CheckBatch> {
        match self.load_all() {
            Ok(mut batches) => batches.pop(),
            Err(e) => {
                tracing::warn!("Could not read previous results, treating log as empty: {}", e);
                None
            }
        }
    }

    /// Append a batch and drop the oldest entries beyond the cap.
    ///
    /// Returns the number of batches retained.
    pub fn append(&self, batch: CheckBatch) -> Result<usize> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut log = match self.load_all() {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Starting a fresh log at {}: {}", self.path.display(), e);
                Vec::new()
            }
        };

        log.push(batch);
        if log.len() > self.max_batches {
            let excess = log.len() - self.max_batches;
            log.drain(..excess);
        }

        let json = serde_json::to_string_pretty(&log)?;
        write_replacing(&self.path, &json)?;

        tracing::info!("Results saved to {}", self.path.display());
        Ok(log.len())
    }
}

/// Highest inbound update identifier already processed.
pub struct OffsetStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl OffsetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.offset_file)
    }

    /// Stored offset, or 0 when the file is missing or does not hold an integer.
    pub fn load(&self) -> i64 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Persist `offset` if it is greater than the stored one. Returns whether it wrote.
    pub fn advance(&self, offset: i64) -> Result<bool> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if offset <= self.load() {
            return Ok(false);
        }

        write_replacing(&self.path, &offset.to_string())?;
        Ok(true)
    }
}

/// Write to a sibling temp file and rename it over `path`, so readers never
/// see a half-written file.
fn write_replacing(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
