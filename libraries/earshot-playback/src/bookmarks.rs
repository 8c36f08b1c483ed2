//! Bookmark store
//!
//! An ordered collection of bookmarks persisted as one JSON array under
//! `bookmarks:<scope>`. Every mutation is written through immediately.

use earshot_core::{
    keys, Bookmark, BookmarkId, CatalogFilter, EarshotError, StorageAdapter, StorageScope,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::Result;

/// How many bookmarks a collection keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "limit", rename_all = "snake_case")]
pub enum BookmarkCapacity {
    /// No limit
    Unbounded,

    /// At most `n` bookmarks for each track
    PerTrack(usize),

    /// At most `n` bookmarks across all tracks
    Total(usize),
}

impl BookmarkCapacity {
    /// Default policy for a catalog mode
    pub fn for_filter(filter: &CatalogFilter) -> Self {
        match filter {
            CatalogFilter::Single(_) => Self::PerTrack(5),
            CatalogFilter::All => Self::Total(50),
        }
    }
}

/// Persistent bookmark collection for one scope
pub struct BookmarkStore {
    storage: Arc<dyn StorageAdapter>,
    scope: String,
    capacity: BookmarkCapacity,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Load the collection stored for `scope`
    ///
    /// Entries that fail to parse are skipped so one bad record does not hide
    /// the rest.
    pub fn open(
        storage: Arc<dyn StorageAdapter>,
        scope: impl Into<String>,
        capacity: BookmarkCapacity,
    ) -> Self {
        let scope = scope.into();
        let bookmarks = load_collection(storage.as_ref(), &scope);
        debug!(scope = %scope, count = bookmarks.len(), "Opened bookmark collection");

        Self {
            storage,
            scope,
            capacity,
            bookmarks,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn capacity(&self) -> BookmarkCapacity {
        self.capacity
    }

    /// All bookmarks, oldest first
    pub fn all(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Bookmarks of one track, oldest first
    pub fn for_track(&self, track_key: &str) -> Vec<&Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| b.track_key == track_key)
            .collect()
    }

    pub fn find(&self, id: &BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| &b.id == id)
    }

    /// Append a bookmark, evicting the oldest entries over capacity
    ///
    /// Returns the evicted bookmarks. Nothing changes unless the new
    /// collection was persisted.
    pub fn add(&mut self, bookmark: Bookmark) -> Result<Vec<Bookmark>> {
        let track_key = bookmark.track_key.clone();
        info!(
            scope = %self.scope,
            track_key = %track_key,
            seconds = bookmark.time_seconds,
            "Saving bookmark"
        );

        let mut next = self.bookmarks.clone();
        next.push(bookmark);
        let evicted = evict(&mut next, self.capacity, &track_key);

        self.commit(next)?;
        for old in &evicted {
            debug!(id = %old.id, track_key = %old.track_key, "Evicted bookmark");
        }
        Ok(evicted)
    }

    /// Delete one bookmark; returns whether it existed
    pub fn delete(&mut self, id: &BookmarkId) -> Result<bool> {
        if self.find(id).is_none() {
            return Ok(false);
        }

        let next = self
            .bookmarks
            .iter()
            .filter(|b| &b.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        debug!(scope = %self.scope, id = %id, "Deleted bookmark");
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())?;
        info!(scope = %self.scope, "Cleared bookmarks");
        Ok(())
    }

    /// Persist `next`, then make it the in-memory collection
    fn commit(&mut self, next: Vec<Bookmark>) -> Result<()> {
        let json = serde_json::to_string(&next).map_err(EarshotError::from)?;
        self.storage
            .set(StorageScope::Durable, &keys::bookmarks(&self.scope), &json)?;
        self.bookmarks = next;
        Ok(())
    }
}

/// Drop the oldest entries over `capacity`; returns them
fn evict(
    bookmarks: &mut Vec<Bookmark>,
    capacity: BookmarkCapacity,
    track_key: &str,
) -> Vec<Bookmark> {
    let mut evicted = Vec::new();

    match capacity {
        BookmarkCapacity::Unbounded => {}
        BookmarkCapacity::Total(limit) => {
            let limit = limit.max(1);
            if bookmarks.len() > limit {
                let excess = bookmarks.len() - limit;
                evicted.extend(bookmarks.drain(..excess));
            }
        }
        BookmarkCapacity::PerTrack(limit) => {
            let limit = limit.max(1);
            let mut count = bookmarks.iter().filter(|b| b.track_key == track_key).count();

            while count > limit {
                let Some(pos) = bookmarks.iter().position(|b| b.track_key == track_key) else {
                    break;
                };
                evicted.push(bookmarks.remove(pos));
                count -= 1;
            }
        }
    }

    evicted
}

fn load_collection(storage: &dyn StorageAdapter, scope: &str) -> Vec<Bookmark> {
    let raw = match storage.get(StorageScope::Durable, &keys::bookmarks(scope)) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(scope = %scope, error = %e, "Failed to read bookmarks");
            return Vec::new();
        }
    };

    let entries: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(scope = %scope, error = %e, "Ignoring malformed bookmark collection");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Bookmark>(entry) {
            Ok(bookmark) if bookmark.is_valid() => Some(bookmark),
            Ok(bookmark) => {
                warn!(scope = %scope, id = %bookmark.id, "Skipping invalid bookmark");
                None
            }
            Err(e) => {
                warn!(scope = %scope, error = %e, "Skipping unreadable bookmark");
                None
            }
        })
        .collect()
}
