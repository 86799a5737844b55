// src/infrastructure/storage.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::application::KeyValueStore;
use crate::domain::DomainError;

/// Durable key-value storage kept as a JSON object in a single file
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    /// The file on disk holds content that was dropped when opening
    discarded: bool,
}

impl FileKeyValueStore {
    /// Open the store, starting empty when the file does not exist yet.
    ///
    /// A file that is not a JSON object is ignored, and so is every entry
    /// whose value is not a string. The cleaned content replaces the file on
    /// the next write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!(?path, "Storage file does not exist yet");
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
                discarded: false,
            });
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage file {}", path.display()))?;
        let (entries, discarded) = parse_entries(&content, &path);

        Ok(Self {
            path,
            entries,
            discarded,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[instrument(level = "trace", skip(self))]
    fn persist(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| DomainError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| DomainError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

fn parse_entries(content: &str, path: &Path) -> (BTreeMap<String, String>, bool) {
    let raw: BTreeMap<String, Value> = match serde_json::from_str(content) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(?path, error = %e, "Ignoring unreadable storage file");
            return (BTreeMap::new(), true);
        }
    };

    let mut discarded = false;
    let entries = raw
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(value) => Some((key, value)),
            other => {
                warn!(?path, %key, value = %other, "Ignoring non-string storage entry");
                discarded = true;
                None
            }
        })
        .collect();

    (entries, discarded)
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()?;
        self.discarded = false;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DomainError> {
        if self.entries.remove(key).is_some() || self.discarded {
            self.persist()?;
            self.discarded = false;
        }
        Ok(())
    }
}
