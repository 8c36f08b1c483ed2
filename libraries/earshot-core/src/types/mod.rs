mod bookmark;
mod progress;
mod track;

pub use bookmark::{Bookmark, BookmarkId};
pub use progress::{decode_seconds, PendingJump, ProgressRecord};
pub use track::{CatalogFilter, Track};
