//! Core traits for pluggable collaborators

use crate::error::Result;
use crate::types::{CatalogFilter, Track};
use async_trait::async_trait;

/// Remote source of playable tracks
///
/// Implementations fetch from a content service and normalize the response
/// into [`Track`] records. A filtered load that matches nothing must fail with
/// a not-found error rather than return an empty list.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Load the catalog, optionally narrowed to a single track
    async fn load(&self, filter: &CatalogFilter) -> Result<Vec<Track>>;
}
