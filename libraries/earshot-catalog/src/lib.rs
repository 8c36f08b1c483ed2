//! Earshot Catalog
//!
//! Track Catalog Loader: fetches the list of playable tracks from a remote
//! content service and normalizes it into [`Track`](earshot_core::Track)
//! records.
//!
//! - Full catalog and single-track mode share one code path, selected by a
//!   [`CatalogFilter`](earshot_core::CatalogFilter).
//! - A filtered load that matches nothing fails with
//!   [`CatalogError::TrackNotFound`].
//! - Missing or malformed audio URLs become `audio_url = None`; the track is
//!   kept so it can be shown as unavailable.
//!
//! # Example
//!
//! ```ignore
//! use earshot_catalog::{CatalogClient, CatalogConfig};
//! use earshot_core::CatalogFilter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::new("https://content.example.com"))?;
//!     let tracks = client.fetch(&CatalogFilter::All).await?;
//!     println!("Found {} tracks", tracks.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod normalize;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use normalize::{normalize_tracks, select_tracks};
pub use types::{CatalogConfig, CatalogResponse, RemoteTrack};
