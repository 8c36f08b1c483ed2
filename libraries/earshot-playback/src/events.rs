//! Playback Events
//!
//! Queued by the controller as state changes and drained by the host.
//! Position updates follow the resource's time reports.

use serde::{Deserialize, Serialize};

use crate::restore::RestoreSource;
use crate::speed::Speed;
use crate::types::PlayerStatus;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Derived status changed
    StatusChanged { status: PlayerStatus },

    /// A different track became current
    TrackChanged {
        index: usize,
        track_key: String,
        /// Key of the previous track (if any)
        previous_track_key: Option<String>,
    },

    /// Playhead moved
    PositionChanged {
        position: f64,
        duration: Option<f64>,
    },

    /// Start position applied after metadata arrived
    Restored {
        track_key: String,
        source: RestoreSource,
        position: f64,
    },

    SpeedChanged { speed: Speed },

    VolumeChanged { level: f64, muted: bool },

    /// Progress written for a track
    ProgressSaved { track_key: String, seconds: f64 },

    /// Stored progress removed (end window or end of media)
    ProgressCleared { track_key: String },

    /// Bookmark collection changed
    BookmarksChanged { count: usize },

    /// Catalog replaced
    CatalogLoaded { tracks: usize },

    /// User-facing, non-fatal error
    Error { message: String },
}
