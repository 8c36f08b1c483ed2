/// Bookmark domain type
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Bookmark identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(String);

impl BookmarkId {
    /// Create a bookmark ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random bookmark ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, explicitly saved playback position
///
/// Created at the controller's current position and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: BookmarkId,
    pub track_key: String,
    pub time_seconds: f64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark stamped with a fresh id and the current time
    pub fn new(track_key: impl Into<String>, time_seconds: f64, label: impl Into<String>) -> Self {
        Self {
            id: BookmarkId::generate(),
            track_key: track_key.into(),
            time_seconds,
            label: label.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the record can be used for a jump
    pub fn is_valid(&self) -> bool {
        !self.track_key.trim().is_empty()
            && self.time_seconds.is_finite()
            && self.time_seconds >= 0.0
    }
}
