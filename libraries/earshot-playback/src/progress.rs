//! Progress store
//!
//! Last known position per track, stored durably under `progress:<trackKey>`.
//! Positions inside the trailing window of a track are never kept, so a
//! finished track starts from zero next time instead of resuming at its end.

use earshot_core::{decode_seconds, keys, ProgressRecord, StorageAdapter, StorageScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// What a save request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    /// Position written
    Saved,
    /// Position was in the trailing window; any stored record was removed
    Cleared,
    /// Nothing usable to save
    Skipped,
    /// Storage refused the write
    Failed,
}

/// Durable per-track progress
pub struct ProgressStore {
    storage: Arc<dyn StorageAdapter>,
    end_window_secs: f64,
}

impl ProgressStore {
    pub fn new(storage: Arc<dyn StorageAdapter>, end_window_secs: f64) -> Self {
        Self {
            storage,
            end_window_secs: end_window_secs.max(0.0),
        }
    }

    /// Stored position for a track, if any
    ///
    /// Unreadable values are treated as absent.
    pub fn load(&self, track_key: &str) -> Option<f64> {
        match self.storage.get(StorageScope::Durable, &keys::progress(track_key)) {
            Ok(Some(raw)) => {
                let parsed = decode_seconds(&raw);
                if parsed.is_none() {
                    warn!(track_key = %track_key, raw = %raw, "Ignoring malformed progress value");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!(track_key = %track_key, error = %e, "Failed to read progress");
                None
            }
        }
    }

    /// Whether `time` falls in the trailing window of `duration`
    pub fn in_end_window(&self, time: f64, duration: f64) -> bool {
        time >= duration - self.end_window_secs
    }

    /// Save a position for `track_key`
    ///
    /// `duration` is the track length when known. Positions in the trailing
    /// window clear the stored record instead.
    pub fn save(&self, track_key: &str, time: f64, duration: Option<f64>) -> SaveOutcome {
        if !time.is_finite() || time < 0.0 {
            return SaveOutcome::Skipped;
        }

        if let Some(duration) = duration {
            if self.in_end_window(time, duration) {
                return if self.clear(track_key) {
                    SaveOutcome::Cleared
                } else {
                    SaveOutcome::Failed
                };
            }
        }

        let record = ProgressRecord::new(track_key, time);
        match self.storage.set(
            StorageScope::Durable,
            &keys::progress(&record.track_key),
            &record.encode(),
        ) {
            Ok(()) => {
                debug!(track_key = %track_key, seconds = time, "Saved progress");
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(track_key = %track_key, error = %e, "Failed to save progress");
                SaveOutcome::Failed
            }
        }
    }

    /// Remove the stored record; returns false when storage failed
    pub fn clear(&self, track_key: &str) -> bool {
        match self.storage.remove(StorageScope::Durable, &keys::progress(track_key)) {
            Ok(()) => {
                debug!(track_key = %track_key, "Cleared progress");
                true
            }
            Err(e) => {
                warn!(track_key = %track_key, error = %e, "Failed to clear progress");
                false
            }
        }
    }

    /// All stored records, in key order
    pub fn records(&self) -> Vec<ProgressRecord> {
        let keys = match self
            .storage
            .keys_with_prefix(StorageScope::Durable, keys::PROGRESS_PREFIX)
        {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Failed to list progress records");
                return Vec::new();
            }
        };

        keys.iter()
            .filter_map(|key| {
                let track_key = key.strip_prefix(keys::PROGRESS_PREFIX)?;
                self.load(track_key)
                    .map(|time| ProgressRecord::new(track_key, time))
            })
            .collect()
    }
}
