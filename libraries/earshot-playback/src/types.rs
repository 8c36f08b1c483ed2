//! Core types for playback management

use serde::{Deserialize, Serialize};

use crate::bookmarks::BookmarkCapacity;
use crate::speed::Speed;

/// What the listener sees, derived from transport, binding and error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Catalog is empty
    NoTrack,

    /// Current track has no playable audio
    Unavailable,

    /// Source assigned, metadata not yet known
    Loading,

    /// Ready, not playing
    Paused,

    /// Play issued, waiting for the resource to confirm
    PlayRequested,

    /// Resource confirmed playback
    Playing,

    /// Final track reached its end
    Ended,

    /// Catalog, start or runtime failure
    Error,
}

impl PlayerStatus {
    /// Whether transport commands have any effect
    pub fn is_playable(self) -> bool {
        !matches!(self, Self::NoTrack | Self::Unavailable)
    }
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds of playback between periodic progress saves (default: 5)
    pub progress_save_interval_secs: f64,

    /// Saved positions at or below this are not resumed (default: 1)
    pub resume_min_secs: f64,

    /// Trailing window in which progress is neither resumed nor kept (default: 5)
    pub end_window_secs: f64,

    /// Initial volume, 0.0 to 1.0 (default: 1.0)
    pub initial_volume: f64,

    /// Initial speed (default: 1x)
    pub initial_speed: Speed,

    /// Bookmark capacity; derived from the catalog filter when unset
    pub bookmark_capacity: Option<BookmarkCapacity>,

    /// Whether next/previous/select start playing (default: true)
    pub autoplay_on_navigate: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            progress_save_interval_secs: 5.0,
            resume_min_secs: 1.0,
            end_window_secs: 5.0,
            initial_volume: 1.0,
            initial_speed: Speed::Normal,
            bookmark_capacity: None,
            autoplay_on_navigate: true,
        }
    }
}

/// Snapshot of controller state for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub status: PlayerStatus,
    pub track_index: usize,
    pub track_key: Option<String>,
    pub intent_playing: bool,
    pub actually_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub speed: Speed,
    pub volume: f64,
    pub muted: bool,
    pub loading: bool,
    pub error: Option<String>,
}
