//! Normalization of service responses into stable track records.

use crate::error::{CatalogError, Result};
use crate::types::RemoteTrack;
use earshot_core::{CatalogFilter, Track};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Convert raw service tracks into [`Track`]s ordered by `order`.
///
/// Tracks without any usable identity (no id and no slug) are dropped.
/// Everything else is kept; a bad audio URL only makes the track unavailable.
/// Relative audio URLs are resolved against `base` when one is given.
pub fn normalize_tracks(remote: Vec<RemoteTrack>, base: Option<&Url>) -> Vec<Track> {
    let mut tracks: Vec<Track> = remote
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| normalize_track(raw, position, base))
        .collect();

    // Stable: equal orders keep service order
    tracks.sort_by_key(|t| t.order);
    tracks
}

fn normalize_track(raw: RemoteTrack, position: usize, base: Option<&Url>) -> Option<Track> {
    let slug = raw
        .slug
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let id = match raw.id.as_ref().and_then(normalize_id) {
        Some(id) => id,
        None => match &slug {
            Some(slug) => slug.clone(),
            None => {
                warn!(position, "Dropping catalog entry without id or slug");
                return None;
            }
        },
    };

    let audio_url = raw.audio_url.as_ref().and_then(|v| normalize_audio_url(v, base));
    if audio_url.is_none() {
        debug!(track_id = %id, "Track has no playable audio URL");
    }

    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    Some(Track {
        id,
        title,
        slug,
        order: raw.order.unwrap_or(position as i64),
        audio_url,
    })
}

fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_audio_url(value: &Value, base: Option<&Url>) -> Option<String> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(raw).ok()?,
        Err(_) => return None,
    };

    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

/// Apply a catalog filter.
///
/// `CatalogFilter::All` returns the list unchanged (possibly empty).
/// `CatalogFilter::Single` returns exactly the matching track, or
/// [`CatalogError::TrackNotFound`].
pub fn select_tracks(tracks: Vec<Track>, filter: &CatalogFilter) -> Result<Vec<Track>> {
    match filter {
        CatalogFilter::All => Ok(tracks),
        CatalogFilter::Single(key) => tracks
            .into_iter()
            .find(|t| t.matches_key(key))
            .map(|t| vec![t])
            .ok_or_else(|| CatalogError::TrackNotFound(key.clone())),
    }
}
