//! Restore precedence
//!
//! When a track's metadata arrives the start position is resolved in order:
//! a pending jump, then saved progress, then zero.

use earshot_core::{clamp_position, keys, PendingJump, StorageAdapter, StorageScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where a start position came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreSource {
    PendingJump,
    Progress,
    Start,
}

/// Resolved start position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestorePlan {
    pub source: RestoreSource,
    pub position: f64,
}

/// Thresholds for accepting saved progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreRules {
    /// Saved times at or below this are ignored
    pub min_resume_secs: f64,
    /// Saved times within this distance of the end are ignored
    pub end_window_secs: f64,
}

/// Resolve the start position for a freshly loaded track
pub fn resolve_restore(
    pending: Option<PendingJump>,
    saved: Option<f64>,
    duration: f64,
    rules: RestoreRules,
) -> RestorePlan {
    if let Some(jump) = pending {
        return RestorePlan {
            source: RestoreSource::PendingJump,
            position: clamp_position(jump.time_seconds, Some(duration)),
        };
    }

    match saved {
        Some(t) if t > rules.min_resume_secs && t < duration - rules.end_window_secs => {
            RestorePlan {
                source: RestoreSource::Progress,
                position: t,
            }
        }
        _ => RestorePlan {
            source: RestoreSource::Start,
            position: 0.0,
        },
    }
}

/// Single-use deferred seek held in transient storage
///
/// The stored value is plain seconds. The slot also remembers which track the
/// jump was recorded for, so a jump never lands on a different track.
pub struct PendingJumpSlot {
    storage: Arc<dyn StorageAdapter>,
    target: Option<String>,
}

impl PendingJumpSlot {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            target: None,
        }
    }

    /// Record a jump to apply when `track_key`'s metadata arrives
    pub fn set(&mut self, jump: PendingJump, track_key: &str) {
        self.target = Some(track_key.to_owned());
        if let Err(e) = self
            .storage
            .set(StorageScope::Transient, keys::PENDING_JUMP, &jump.encode())
        {
            warn!(error = %e, "Failed to store pending jump");
        }
    }

    /// Track the jump was recorded for, if recorded by this slot
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Consume the jump for `track_key`; the slot is cleared either way
    ///
    /// A jump recorded for another track is dropped. A stored jump with no
    /// known target was written before this session's controller existed and
    /// is accepted.
    pub fn take_for(&mut self, track_key: &str) -> Option<PendingJump> {
        let jump = self.read();
        let target = self.target.take();
        self.clear();

        match (jump, target) {
            (Some(_), Some(target)) if target != track_key => {
                debug!(
                    target = %target,
                    track_key = %track_key,
                    "Dropping pending jump for another track"
                );
                None
            }
            (Some(jump), _) => {
                debug!(seconds = jump.time_seconds, "Consuming pending jump");
                Some(jump)
            }
            (None, _) => None,
        }
    }

    /// Drop the jump unless it was recorded for `track_key`
    pub fn retain_for(&mut self, track_key: Option<&str>) {
        if self.target.is_some() && self.target.as_deref() != track_key {
            debug!(target = ?self.target, "Discarding pending jump for unbound track");
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.target = None;
        if let Err(e) = self
            .storage
            .remove(StorageScope::Transient, keys::PENDING_JUMP)
        {
            warn!(error = %e, "Failed to clear pending jump");
        }
    }

    fn read(&self) -> Option<PendingJump> {
        match self.storage.get(StorageScope::Transient, keys::PENDING_JUMP) {
            Ok(raw) => raw.as_deref().and_then(PendingJump::decode),
            Err(e) => {
                warn!(error = %e, "Failed to read pending jump");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_storage::MemoryStorage;
    use proptest::prelude::*;

    const RULES: RestoreRules = RestoreRules {
        min_resume_secs: 1.0,
        end_window_secs: 5.0,
    };

    #[test]
    fn pending_jump_wins_over_progress() {
        let plan = resolve_restore(Some(PendingJump::new(42.0)), Some(30.0), 120.0, RULES);
        assert_eq!(plan.source, RestoreSource::PendingJump);
        assert_eq!(plan.position, 42.0);
    }

    #[test]
    fn pending_jump_is_clamped() {
        let plan = resolve_restore(Some(PendingJump::new(500.0)), None, 120.0, RULES);
        assert_eq!(plan.position, 120.0);
    }

    #[test]
    fn valid_progress_resumes() {
        let plan = resolve_restore(None, Some(30.0), 120.0, RULES);
        assert_eq!(plan.source, RestoreSource::Progress);
        assert_eq!(plan.position, 30.0);
    }

    #[test]
    fn progress_near_end_starts_over() {
        let plan = resolve_restore(None, Some(118.0), 120.0, RULES);
        assert_eq!(plan.source, RestoreSource::Start);
        assert_eq!(plan.position, 0.0);
    }

    #[test]
    fn tiny_progress_starts_over() {
        let plan = resolve_restore(None, Some(0.4), 120.0, RULES);
        assert_eq!(plan.source, RestoreSource::Start);
    }

    #[test]
    fn slot_is_single_use() {
        let storage = Arc::new(MemoryStorage::new());
        let mut slot = PendingJumpSlot::new(storage.clone());

        slot.set(PendingJump::new(12.5), "intro");
        assert_eq!(slot.target(), Some("intro"));
        assert_eq!(
            storage
                .get(StorageScope::Transient, "pending-jump")
                .unwrap()
                .as_deref(),
            Some("12.500")
        );

        assert_eq!(slot.take_for("intro"), Some(PendingJump::new(12.5)));
        assert_eq!(slot.take_for("intro"), None);
        assert_eq!(slot.target(), None);
    }

    #[test]
    fn jump_for_other_track_is_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        let mut slot = PendingJumpSlot::new(storage.clone());

        slot.set(PendingJump::new(75.0), "closing");
        assert_eq!(slot.take_for("arrival"), None);
        assert!(storage
            .get(StorageScope::Transient, "pending-jump")
            .unwrap()
            .is_none());
    }

    #[test]
    fn stored_jump_without_target_is_accepted() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(StorageScope::Transient, "pending-jump", "42")
            .unwrap();
        let mut slot = PendingJumpSlot::new(storage);

        assert_eq!(slot.take_for("arrival"), Some(PendingJump::new(42.0)));
    }

    #[test]
    fn retain_for_keeps_only_matching_target() {
        let storage = Arc::new(MemoryStorage::new());
        let mut slot = PendingJumpSlot::new(storage.clone());

        slot.set(PendingJump::new(30.0), "body-scan");
        slot.retain_for(Some("body-scan"));
        assert_eq!(slot.target(), Some("body-scan"));

        slot.retain_for(Some("arrival"));
        assert_eq!(slot.target(), None);
        assert!(storage
            .get(StorageScope::Transient, "pending-jump")
            .unwrap()
            .is_none());
    }

    #[test]
    fn unreadable_slot_is_cleared() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(StorageScope::Transient, "pending-jump", "soon")
            .unwrap();
        let mut slot = PendingJumpSlot::new(storage.clone());

        assert_eq!(slot.take_for("intro"), None);
        assert!(storage
            .get(StorageScope::Transient, "pending-jump")
            .unwrap()
            .is_none());
    }

    proptest! {
        #[test]
        fn pending_jump_always_wins(
            jump in 0.0f64..1000.0,
            saved in proptest::option::of(0.0f64..1000.0),
            duration in 10.0f64..1000.0,
        ) {
            let plan = resolve_restore(Some(PendingJump::new(jump)), saved, duration, RULES);
            prop_assert_eq!(plan.source, RestoreSource::PendingJump);
            prop_assert!(plan.position <= duration);
        }

        #[test]
        fn restored_progress_is_never_in_end_window(
            saved in 0.0f64..1000.0,
            duration in 10.0f64..1000.0,
        ) {
            let plan = resolve_restore(None, Some(saved), duration, RULES);
            prop_assert!(plan.position < duration - RULES.end_window_secs || plan.position == 0.0);
        }
    }
}
