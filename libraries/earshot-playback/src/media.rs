//! Platform-agnostic media resource trait
//!
//! Abstracts the host's "play a URL" primitive (an HTML audio element, a
//! native player, a simulated clock). The resource reports back through
//! [`MediaEvent`]s that the host feeds into
//! [`PlaybackController::handle_media_event`](crate::PlaybackController::handle_media_event).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one bound source
///
/// Each bind gets a fresh token, so events from a superseded source can be
/// told apart even when the URL did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceToken(u64);

impl SourceToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Platform media resource
///
/// Implementors own the actual playable element. Every event they emit must
/// carry the token given in the most recent [`attach`](Self::attach) for the
/// source it concerns. Play is fire-and-forget: the outcome arrives later as
/// `PlayConfirmed` or `PlayRejected`.
pub trait MediaResource: Send {
    /// Assign a new source and start loading it
    fn attach(&mut self, token: SourceToken, url: &str);

    /// Stop delivering events for `token` and release the source
    fn detach(&mut self, token: SourceToken);

    /// Request playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, seconds: f64);

    /// Set the playback rate multiplier
    fn set_playback_rate(&mut self, rate: f64);

    /// Set the volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Set the mute flag
    fn set_muted(&mut self, muted: bool);
}

/// Lifecycle signal reported by a media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEventKind {
    /// Duration is known and seeking is possible
    MetadataReady { duration: f64 },

    /// Playhead moved
    TimeUpdate { position: f64 },

    /// A previous `play()` took effect
    PlayConfirmed,

    /// A previous `play()` was refused
    PlayRejected { reason: String },

    /// Playback paused (by the resource or after a `pause()`)
    Paused,

    /// End of media reached
    Ended,

    /// Network or decoding failure
    Error { message: String },
}

/// Event tagged with the source it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
    pub token: SourceToken,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(token: SourceToken, kind: MediaEventKind) -> Self {
        Self { token, kind }
    }
}
