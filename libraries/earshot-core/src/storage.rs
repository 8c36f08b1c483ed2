//! Storage adapter trait
//!
//! Key/value persistence over two scopes. The durable scope survives restarts;
//! the transient scope lives only as long as one navigation session.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Persistence scope for a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// Survives restarts (progress, bookmarks)
    Durable,

    /// Survives only within one session (pending jumps)
    Transient,
}

impl StorageScope {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Transient => "transient",
        }
    }
}

impl std::fmt::Display for StorageScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key/value storage shared by the progress and bookmark stores
///
/// Implementations use interior mutability so a single adapter can be shared
/// behind an `Arc` by the controller and by the host that inspects it.
pub trait StorageAdapter: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, scope: StorageScope, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, scope: StorageScope, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key is not an error
    fn remove(&self, scope: StorageScope, key: &str) -> Result<()>;

    /// List keys in a scope that start with `prefix`
    fn keys_with_prefix(&self, scope: StorageScope, prefix: &str) -> Result<Vec<String>>;
}

/// Storage key layout
pub mod keys {
    /// Prefix for per-track progress records
    pub const PROGRESS_PREFIX: &str = "progress:";

    /// Prefix for bookmark collections
    pub const BOOKMARKS_PREFIX: &str = "bookmarks:";

    /// Transient key for a one-shot deferred seek
    pub const PENDING_JUMP: &str = "pending-jump";

    /// `progress:<trackKey>`
    pub fn progress(track_key: &str) -> String {
        format!("{PROGRESS_PREFIX}{track_key}")
    }

    /// `bookmarks:<scope>`
    pub fn bookmarks(scope: &str) -> String {
        format!("{BOOKMARKS_PREFIX}{scope}")
    }
}
