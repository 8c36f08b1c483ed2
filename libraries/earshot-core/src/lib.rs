//! Earshot Core
//!
//! Platform-agnostic core types, traits, and error handling for the Earshot
//! listening engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Bookmark`, `ProgressRecord`, `PendingJump`
//! - **Core Traits**: `StorageAdapter` (durable + transient key/value scopes),
//!   `TrackCatalog` (remote track listing)
//! - **Error Handling**: Unified `EarshotError` and `Result` types
//! - **Utilities**: time formatting and clamping helpers
//!
//! # Example
//!
//! ```rust
//! use earshot_core::{format_time, Track};
//!
//! let track = Track::new("42", "Morning Practice")
//!     .with_slug("morning-practice")
//!     .with_audio_url("https://cdn.example.com/morning.mp3");
//!
//! assert_eq!(track.key(), "morning-practice");
//! assert!(track.is_playable());
//! assert_eq!(format_time(75.0), "1:15");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod time;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EarshotError, Result};
pub use storage::{keys, StorageAdapter, StorageScope};
pub use time::{clamp_position, clamp_unit, format_time};
pub use traits::TrackCatalog;

pub use types::{decode_seconds, Bookmark, BookmarkId, CatalogFilter, PendingJump, ProgressRecord, Track};
