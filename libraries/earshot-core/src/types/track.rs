/// Track domain type
use serde::{Deserialize, Serialize};

/// One playable audio unit
///
/// Immutable once loaded. Reloading the catalog replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier assigned by the content service
    pub id: String,

    /// Display title
    pub title: String,

    /// Stable human-readable key (preferred identity)
    pub slug: Option<String>,

    /// Position in the catalog
    pub order: i64,

    /// Playable URL, `None` when missing or malformed
    pub audio_url: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: None,
            order: 0,
            audio_url: None,
        }
    }

    /// Set the slug
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Set the catalog order
    #[must_use]
    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set the audio URL
    #[must_use]
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Identity used for persistence: the slug when present, else the id
    pub fn key(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => &self.id,
        }
    }

    /// Whether the track has something to play
    pub fn is_playable(&self) -> bool {
        self.audio_url.is_some()
    }

    /// Whether `key` names this track by slug or by id
    pub fn matches_key(&self, key: &str) -> bool {
        self.key() == key || self.id == key
    }
}

/// Which part of the catalog a loader should return
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "key")]
pub enum CatalogFilter {
    /// The full ordered catalog
    #[default]
    All,

    /// Exactly one track, by slug or id
    Single(String),
}

impl CatalogFilter {
    /// Build a filter from an optional key
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some(k) if !k.trim().is_empty() => Self::Single(k.trim().to_string()),
            _ => Self::All,
        }
    }

    /// Filter key, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Single(key) => Some(key),
        }
    }

    /// Name of the bookmark scope this filter persists under
    pub fn scope_name(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Single(key) => key,
        }
    }
}
