//! JSON file storage adapter
//!
//! The durable scope is a flat `key -> value` JSON object rewritten on every
//! mutation (write to a sibling temp file, then rename). The transient scope is
//! never written to disk.

use crate::{poisoned, MemoryStorage};
use earshot_core::{EarshotError, Result, StorageAdapter, StorageScope};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// Storage adapter with a JSON file behind the durable scope
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    durable: RwLock<BTreeMap<String, String>>,
    transient: MemoryStorage,
}

impl FileStorage {
    /// Open (or lazily create) the store at `path`
    ///
    /// Writes to the durable scope only take effect in memory once the file
    /// was replaced.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is an error, so existing data is never silently overwritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let durable = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), entries = durable.len(), "Opened file storage");

        Ok(Self {
            path,
            durable: RwLock::new(durable),
            transient: MemoryStorage::new(),
        })
    }

    /// Location of the durable document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            EarshotError::storage(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), entries = map.len(), "Persisted durable storage");
        Ok(())
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>> {
        match scope {
            StorageScope::Durable => Ok(self.durable.read().map_err(poisoned)?.get(key).cloned()),
            StorageScope::Transient => self.transient.get(scope, key),
        }
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        match scope {
            StorageScope::Durable => {
                let mut map = self.durable.write().map_err(poisoned)?;
                let mut next = map.clone();
                next.insert(key.to_string(), value.to_string());
                self.persist(&next)?;
                *map = next;
                Ok(())
            }
            StorageScope::Transient => self.transient.set(scope, key, value),
        }
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        match scope {
            StorageScope::Durable => {
                let mut map = self.durable.write().map_err(poisoned)?;
                if map.contains_key(key) {
                    let mut next = map.clone();
                    next.remove(key);
                    self.persist(&next)?;
                    *map = next;
                }
                Ok(())
            }
            StorageScope::Transient => self.transient.remove(scope, key),
        }
    }

    fn keys_with_prefix(&self, scope: StorageScope, prefix: &str) -> Result<Vec<String>> {
        match scope {
            StorageScope::Durable => Ok(self
                .durable
                .read()
                .map_err(poisoned)?
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect()),
            StorageScope::Transient => self.transient.keys_with_prefix(scope, prefix),
        }
    }
}
