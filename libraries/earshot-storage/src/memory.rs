//! In-memory storage adapter

use crate::poisoned;
use earshot_core::{Result, StorageAdapter, StorageScope};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Storage adapter that keeps both scopes in memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    durable: RwLock<BTreeMap<String, String>>,
    transient: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the navigation session: drop every transient value
    pub fn end_session(&self) -> Result<()> {
        self.transient.write().map_err(poisoned)?.clear();
        Ok(())
    }

    /// Number of values held in a scope
    pub fn len(&self, scope: StorageScope) -> Result<usize> {
        Ok(self.map(scope).read().map_err(poisoned)?.len())
    }

    fn map(&self, scope: StorageScope) -> &RwLock<BTreeMap<String, String>> {
        match scope {
            StorageScope::Durable => &self.durable,
            StorageScope::Transient => &self.transient,
        }
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>> {
        Ok(self.map(scope).read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()> {
        self.map(scope)
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, scope: StorageScope, key: &str) -> Result<()> {
        self.map(scope).write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, scope: StorageScope, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .map(scope)
            .read()
            .map_err(poisoned)?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let storage = MemoryStorage::new();
        storage.set(StorageScope::Durable, "k", "durable").unwrap();
        storage.set(StorageScope::Transient, "k", "transient").unwrap();

        assert_eq!(
            storage.get(StorageScope::Durable, "k").unwrap().as_deref(),
            Some("durable")
        );
        assert_eq!(
            storage.get(StorageScope::Transient, "k").unwrap().as_deref(),
            Some("transient")
        );
    }

    #[test]
    fn end_session_clears_transient_only() {
        let storage = MemoryStorage::new();
        storage.set(StorageScope::Durable, "progress:a", "1").unwrap();
        storage.set(StorageScope::Transient, "pending-jump", "2").unwrap();

        storage.end_session().unwrap();

        assert_eq!(storage.len(StorageScope::Durable).unwrap(), 1);
        assert_eq!(storage.len(StorageScope::Transient).unwrap(), 0);
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove(StorageScope::Durable, "missing").is_ok());
    }

    #[test]
    fn lists_keys_by_prefix() {
        let storage = MemoryStorage::new();
        storage.set(StorageScope::Durable, "progress:a", "1").unwrap();
        storage.set(StorageScope::Durable, "progress:b", "2").unwrap();
        storage.set(StorageScope::Durable, "bookmarks:all", "[]").unwrap();

        let keys = storage
            .keys_with_prefix(StorageScope::Durable, "progress:")
            .unwrap();
        assert_eq!(keys, vec!["progress:a".to_string(), "progress:b".to_string()]);
    }
}
