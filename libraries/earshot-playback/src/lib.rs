//! Earshot - Playback Management
//!
//! Platform-agnostic playback control for Earshot.
//!
//! This crate provides:
//! - A playback controller that separates play intent from confirmed playback
//! - Media binding with source tokens, so events from a replaced source are ignored
//! - Per-track progress with resume and a trailing "don't resume at the end" window
//! - Bookmarks with capacity policies and cross-track jumps
//! - Speed cycling (1x, 1.25x, 1.5x, 2x) and volume/mute
//!
//! # Architecture
//!
//! `earshot-playback` performs no I/O of its own and needs no async runtime:
//! - The media element is provided through [`MediaResource`]
//! - Persistence goes through the core `StorageAdapter`
//! - The catalog comes from any core `TrackCatalog`
//!
//! The host forwards resource events to [`PlaybackController::handle_media_event`]
//! and drains [`PlaybackEvent`]s to update its view.
//!
//! # Example
//!
//! ```rust
//! use earshot_playback::{MediaResource, PlaybackConfig, PlaybackController, SourceToken};
//! use earshot_storage::MemoryStorage;
//! use std::sync::Arc;
//!
//! struct Silent;
//!
//! impl MediaResource for Silent {
//!     fn attach(&mut self, _token: SourceToken, _url: &str) {}
//!     fn detach(&mut self, _token: SourceToken) {}
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _seconds: f64) {}
//!     fn set_playback_rate(&mut self, _rate: f64) {}
//!     fn set_volume(&mut self, _volume: f64) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! let mut controller = PlaybackController::new(
//!     PlaybackConfig::default(),
//!     Arc::new(MemoryStorage::new()),
//!     Box::new(Silent),
//! );
//!
//! controller.set_volume(1.5);
//! assert_eq!(controller.volume(), 1.0);
//! assert_eq!(controller.change_speed().rate(), 1.25);
//! ```

mod binding;
mod bookmarks;
mod controller;
mod error;
pub mod events;
mod media;
mod progress;
mod restore;
mod speed;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use binding::{BindOutcome, MediaBinding};
pub use bookmarks::{BookmarkCapacity, BookmarkStore};
pub use controller::{LoadTicket, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use media::{MediaEvent, MediaEventKind, MediaResource, SourceToken};
pub use progress::{ProgressStore, SaveOutcome};
pub use restore::{resolve_restore, PendingJumpSlot, RestorePlan, RestoreRules, RestoreSource};
pub use speed::Speed;
pub use transport::{ResourceCommand, Transition, Transport, TransportInput};
pub use types::{PlaybackConfig, PlaybackState, PlayerStatus};
pub use volume::Volume;
