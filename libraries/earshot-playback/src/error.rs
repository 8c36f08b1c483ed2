//! Error types for playback management

use earshot_core::EarshotError;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Current track has no playable URL
    #[error("Track has no playable audio: {0}")]
    TrackUnavailable(String),

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Bookmark record is malformed
    #[error("Unable to jump: invalid bookmark {0}")]
    InvalidBookmark(String),

    /// Bookmark points at a track that is not in the catalog
    #[error("Unable to jump: track {0} is not in the catalog")]
    BookmarkTrackMissing(String),

    /// Persistence failed
    #[error("Storage error: {0}")]
    Storage(#[from] EarshotError),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
