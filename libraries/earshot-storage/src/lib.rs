//! Earshot Storage
//!
//! [`StorageAdapter`](earshot_core::StorageAdapter) implementations.
//!
//! - [`MemoryStorage`]: both scopes held in memory. Used by tests and by hosts
//!   that do not need durability.
//! - [`FileStorage`]: the durable scope is persisted as a single JSON document
//!   on disk; the transient scope lives in memory and ends with the process.
//!
//! # Example
//!
//! ```rust
//! use earshot_core::{StorageAdapter, StorageScope};
//! use earshot_storage::MemoryStorage;
//!
//! let storage = MemoryStorage::new();
//! storage.set(StorageScope::Durable, "progress:intro", "30.000").unwrap();
//! assert_eq!(
//!     storage.get(StorageScope::Durable, "progress:intro").unwrap().as_deref(),
//!     Some("30.000")
//! );
//! ```

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use earshot_core::EarshotError;
use std::sync::PoisonError;

fn poisoned<T>(_: PoisonError<T>) -> EarshotError {
    EarshotError::storage("storage lock poisoned")
}
