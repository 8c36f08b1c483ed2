//! Playback controller - core orchestration
//!
//! Owns the track list and all playback state. Transport commands come from
//! the host; lifecycle signals come back from the media resource through
//! [`PlaybackController::handle_media_event`]. Every asynchronous outcome is
//! turned into state here, never into a panic or an unhandled error.

use std::sync::Arc;

use earshot_core::{
    clamp_position, clamp_unit, format_time, Bookmark, BookmarkId, CatalogFilter, EarshotError,
    PendingJump, StorageAdapter, Track, TrackCatalog,
};
use tracing::{debug, info, warn};

use crate::{
    binding::{BindOutcome, MediaBinding},
    bookmarks::{BookmarkCapacity, BookmarkStore},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    media::{MediaEvent, MediaEventKind, MediaResource},
    progress::{ProgressStore, SaveOutcome},
    restore::{resolve_restore, PendingJumpSlot, RestoreRules},
    speed::Speed,
    transport::{ResourceCommand, Transport, TransportInput},
    types::{PlaybackConfig, PlaybackState, PlayerStatus},
    volume::Volume,
};

/// Identifies one catalog load; results for older tickets are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Playback controller
///
/// Single-threaded and event driven: the host calls transport methods and
/// forwards media events, then drains [`PlaybackEvent`]s to update its view.
pub struct PlaybackController {
    config: PlaybackConfig,
    storage: Arc<dyn StorageAdapter>,

    // Catalog
    filter: CatalogFilter,
    tracks: Vec<Track>,
    track_index: usize,
    catalog_loading: bool,
    load_seq: u64,
    requested_filter: Option<CatalogFilter>,

    // Playback state
    transport: Transport,
    current_time: f64,
    last_saved_at: f64,
    ended: bool,
    speed: Speed,
    volume: Volume,
    error: Option<String>,

    binding: MediaBinding,
    progress: ProgressStore,
    pending_jump: PendingJumpSlot,
    bookmarks: BookmarkStore,

    events: Vec<PlaybackEvent>,
    last_status: PlayerStatus,
}

impl PlaybackController {
    /// Create a controller with an empty catalog
    ///
    /// The media resource is owned by the controller's binding from here on.
    pub fn new(
        config: PlaybackConfig,
        storage: Arc<dyn StorageAdapter>,
        resource: Box<dyn MediaResource>,
    ) -> Self {
        let filter = CatalogFilter::All;
        let capacity = config
            .bookmark_capacity
            .unwrap_or_else(|| BookmarkCapacity::for_filter(&filter));
        let bookmarks = BookmarkStore::open(storage.clone(), filter.scope_name(), capacity);

        let mut binding = MediaBinding::new(resource);
        let volume = Volume::new(config.initial_volume);
        binding.set_volume(volume.level(), volume.is_muted());

        Self {
            progress: ProgressStore::new(storage.clone(), config.end_window_secs),
            pending_jump: PendingJumpSlot::new(storage.clone()),
            speed: config.initial_speed,
            config,
            storage,
            filter,
            tracks: Vec::new(),
            track_index: 0,
            catalog_loading: false,
            load_seq: 0,
            requested_filter: None,
            transport: Transport::Paused,
            current_time: 0.0,
            last_saved_at: 0.0,
            ended: false,
            volume,
            error: None,
            binding,
            bookmarks,
            events: Vec::new(),
            last_status: PlayerStatus::NoTrack,
        }
    }

    // ===== Catalog =====

    /// Fetch and install a catalog
    ///
    /// Failures are recorded in [`error`](Self::error) and returned.
    pub async fn load_catalog(
        &mut self,
        catalog: &dyn TrackCatalog,
        filter: CatalogFilter,
    ) -> Result<usize> {
        let ticket = self.begin_catalog_load(filter.clone());
        let result = catalog.load(&filter).await;
        self.finish_catalog_load(ticket, result);

        match &self.error {
            Some(message) if self.tracks.is_empty() => Err(PlaybackError::Catalog(message.clone())),
            _ => Ok(self.tracks.len()),
        }
    }

    /// Mark a catalog load as started
    ///
    /// Starting another load supersedes this one.
    pub fn begin_catalog_load(&mut self, filter: CatalogFilter) -> LoadTicket {
        self.load_seq += 1;
        self.catalog_loading = true;
        self.requested_filter = Some(filter);
        debug!(ticket = self.load_seq, "Catalog load started");
        self.sync_status();
        LoadTicket(self.load_seq)
    }

    /// Install the result of a catalog load
    ///
    /// Returns false when the ticket was superseded. A pending jump survives
    /// the reload only while it still targets the track that becomes current.
    /// An empty catalog is not an error: status settles on `NoTrack`.
    pub fn finish_catalog_load(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Vec<Track>, EarshotError>,
    ) -> bool {
        if ticket.0 != self.load_seq {
            debug!(ticket = ticket.0, current = self.load_seq, "Ignoring stale catalog result");
            return false;
        }

        self.catalog_loading = false;
        let filter = self.requested_filter.take().unwrap_or_default();

        // Flush while the outgoing track is still bound
        self.save_progress();
        let previous_key = self.current_key().map(str::to_owned);

        self.transport = Transport::Paused;
        self.ended = false;
        self.error = None;
        self.track_index = 0;
        self.use_filter(filter);

        match result {
            Ok(tracks) => {
                info!(tracks = tracks.len(), "Catalog loaded");
                self.tracks = tracks;
                let current = self.current_key().map(str::to_owned);
                self.pending_jump.retain_for(current.as_deref());
                self.emit(PlaybackEvent::CatalogLoaded {
                    tracks: self.tracks.len(),
                });

                if self.tracks.is_empty() {
                    info!("Catalog has no tracks");
                    self.binding.unbind();
                    self.reset_timer();
                } else {
                    self.emit_track_changed(previous_key);
                    self.bind_current();
                }
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                self.tracks.clear();
                self.pending_jump.clear();
                self.binding.unbind();
                self.reset_timer();
                self.set_error(format!("Unable to load tracks: {e}"));
            }
        }

        self.sync_status();
        true
    }

    fn use_filter(&mut self, filter: CatalogFilter) {
        let capacity = self
            .config
            .bookmark_capacity
            .unwrap_or_else(|| BookmarkCapacity::for_filter(&filter));

        if filter.scope_name() != self.bookmarks.scope() || capacity != self.bookmarks.capacity() {
            self.bookmarks =
                BookmarkStore::open(self.storage.clone(), filter.scope_name(), capacity);
            self.emit(PlaybackEvent::BookmarksChanged {
                count: self.bookmarks.len(),
            });
        }
        self.filter = filter;
    }

    // ===== Media Events =====

    /// Apply a lifecycle signal from the media resource
    ///
    /// Events tagged with a source other than the bound one are dropped.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        let Some(kind) = self.binding.accept(event) else {
            return;
        };

        match kind {
            MediaEventKind::MetadataReady { duration } => self.on_metadata_ready(duration),
            MediaEventKind::TimeUpdate { position } => self.on_time_update(position),
            MediaEventKind::PlayConfirmed => {
                let transition = self.transport.apply(TransportInput::Confirmed);
                self.transport = transition.next;
                if transition.command == Some(ResourceCommand::Pause) {
                    debug!("Play confirmed after pause; pausing again");
                    self.binding.pause();
                }
            }
            MediaEventKind::PlayRejected { reason } => {
                let wanted = self.transport.intent_playing();
                self.transport = self.transport.apply(TransportInput::Rejected).next;
                if wanted {
                    warn!(reason = %reason, "Play rejected");
                    self.set_error(format!("Playback could not start: {reason}"));
                } else {
                    debug!(reason = %reason, "Ignoring rejection of a withdrawn play");
                }
            }
            MediaEventKind::Paused => {
                self.transport = self.transport.apply(TransportInput::ResourcePaused).next;
                self.save_progress();
            }
            MediaEventKind::Ended => self.on_ended(),
            MediaEventKind::Error { message } => {
                warn!(error = %message, "Media error");
                self.transport = self.transport.apply(TransportInput::Failed).next;
                self.save_progress();
                self.set_error(format!("Playback failed: {message}"));
            }
        }

        self.sync_status();
    }

    fn on_metadata_ready(&mut self, duration: f64) {
        let Some(key) = self.current_key().map(str::to_owned) else {
            return;
        };

        let plan = resolve_restore(
            self.pending_jump.take_for(&key),
            self.progress.load(&key),
            duration,
            RestoreRules {
                min_resume_secs: self.config.resume_min_secs,
                end_window_secs: self.config.end_window_secs,
            },
        );
        info!(
            track_key = %key,
            source = ?plan.source,
            seconds = plan.position,
            "Restoring position"
        );

        self.binding.seek(plan.position);
        self.binding.set_playback_rate(self.speed.rate());
        self.current_time = plan.position;
        self.last_saved_at = plan.position;

        self.emit(PlaybackEvent::Restored {
            track_key: key,
            source: plan.source,
            position: plan.position,
        });
        self.emit_position();

        // Honor a play queued while loading
        if self.transport == Transport::PlayRequested {
            self.binding.play();
        }
    }

    fn on_time_update(&mut self, position: f64) {
        self.current_time = clamp_position(position, self.binding.duration());
        self.emit_position();

        if self.transport.actually_playing()
            && (self.current_time - self.last_saved_at).abs()
                >= self.config.progress_save_interval_secs
        {
            self.save_progress();
        }
    }

    fn on_ended(&mut self) {
        self.transport = self.transport.apply(TransportInput::Ended).next;
        self.ended = true;

        if let Some(key) = self.current_key().map(str::to_owned) {
            if self.progress.clear(&key) {
                self.emit(PlaybackEvent::ProgressCleared { track_key: key });
            }
        }

        let next = self.track_index + 1;
        if next < self.tracks.len() {
            info!(index = next, "Track ended; advancing");
            if let Err(e) = self.switch_to(next, true, false) {
                warn!(error = %e, "Failed to advance after end");
            }
        } else {
            info!("Final track ended");
            if let Some(duration) = self.binding.duration() {
                self.current_time = duration;
            }
            self.emit_position();
        }
    }

    // ===== Playback Control =====

    /// Toggle between playing and paused
    ///
    /// No-op without a playable track. After the final track ended this
    /// restarts it from zero. While loading, the play is queued until
    /// metadata arrives.
    pub fn play_pause(&mut self) {
        if !self.current_track().is_some_and(Track::is_playable) {
            debug!("play_pause ignored: no playable track");
            return;
        }

        if self.transport.intent_playing() {
            let transition = self.transport.apply(TransportInput::Pause);
            self.transport = transition.next;
            if transition.command == Some(ResourceCommand::Pause) {
                self.binding.pause();
            }
            self.save_progress();
        } else {
            self.error = None;
            if self.ended {
                self.ended = false;
                self.binding.seek(0.0);
                self.reset_timer();
                self.emit_position();
            }

            let transition = self.transport.apply(TransportInput::Play);
            self.transport = transition.next;
            if transition.command == Some(ResourceCommand::Play) && !self.binding.play() {
                debug!("Play queued until metadata is ready");
            }
        }

        self.sync_status();
    }

    /// Seek to `time` seconds, clamped to the track
    ///
    /// Before the duration is known the seek is held as a pending jump.
    pub fn seek(&mut self, time: f64) {
        if !self.current_track().is_some_and(Track::is_playable) {
            return;
        }

        let Some(duration) = self.binding.duration() else {
            let target = clamp_position(time, None);
            debug!(seconds = target, "Deferring seek until metadata is ready");
            if let Some(key) = self.current_key().map(str::to_owned) {
                self.pending_jump.set(PendingJump::new(target), &key);
            }
            return;
        };

        let target = clamp_position(time, Some(duration));
        self.binding.seek(target);
        self.current_time = target;
        self.ended = false;
        self.emit_position();
        self.save_progress();
        self.sync_status();
    }

    /// Seek relative to the current position
    pub fn skip(&mut self, delta: f64) {
        self.seek(self.current_time + delta);
    }

    /// Seek to a fraction (0.0 to 1.0) of the track
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        if let Some(duration) = self.binding.duration() {
            self.seek(clamp_unit(fraction) * duration);
        }
    }

    /// Skip to the next track
    pub fn next(&mut self) -> Result<()> {
        self.select_track(self.track_index + 1)
    }

    /// Go back to the previous track
    pub fn previous(&mut self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        let index = self
            .track_index
            .checked_sub(1)
            .ok_or(PlaybackError::IndexOutOfBounds(0))?;
        self.select_track(index)
    }

    /// Make `index` the current track, playing per configuration
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        self.select_track_with(index, self.config.autoplay_on_navigate)
    }

    /// Make `index` the current track
    pub fn select_track_with(&mut self, index: usize, autoplay: bool) -> Result<()> {
        self.switch_to(index, autoplay, false)
    }

    fn switch_to(&mut self, index: usize, autoplay: bool, keep_pending: bool) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if index >= self.tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }

        self.save_progress();
        if !keep_pending {
            self.pending_jump.clear();
        }

        let previous_key = self.current_key().map(str::to_owned);
        let was_playing = self.transport.intent_playing();

        self.track_index = index;
        self.error = None;
        self.transport = if autoplay && self.tracks[index].is_playable() {
            Transport::PlayRequested
        } else {
            Transport::Paused
        };
        if was_playing && !self.transport.intent_playing() {
            self.binding.pause();
        }

        info!(index, track_key = ?self.current_key(), autoplay, "Switching track");
        self.emit_track_changed(previous_key);
        self.bind_current();
        self.sync_status();
        Ok(())
    }

    /// Retry the current track after an error
    ///
    /// Rebinds the source and resumes at the preserved position. A failed
    /// catalog load is retried with [`load_catalog`](Self::load_catalog).
    pub fn retry(&mut self) -> Result<()> {
        let track = self.current_track().ok_or(PlaybackError::NoTrackLoaded)?;
        let url = track
            .audio_url
            .clone()
            .ok_or_else(|| PlaybackError::TrackUnavailable(track.key().to_owned()))?;

        let key = track.key().to_owned();

        info!(track_key = %key, seconds = self.current_time, "Retrying playback");
        self.error = None;
        self.ended = false;
        self.pending_jump
            .set(PendingJump::new(self.current_time), &key);
        self.transport = Transport::PlayRequested;
        self.binding.rebind(&url);
        self.sync_status();
        Ok(())
    }

    // ===== Speed & Volume =====

    /// Cycle to the next speed and return it
    pub fn change_speed(&mut self) -> Speed {
        self.set_speed(self.speed.next());
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
        self.binding.set_playback_rate(speed.rate());
        self.emit(PlaybackEvent::SpeedChanged { speed });
    }

    /// Set volume, clamped to 0.0-1.0
    pub fn set_volume(&mut self, level: f64) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        self.binding
            .set_volume(self.volume.level(), self.volume.is_muted());
        self.emit(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    // ===== Bookmarks =====

    /// Bookmark the current position
    ///
    /// Without a label the bookmark is named `"<title> @ <m:ss>"`.
    pub fn save_bookmark(&mut self, label: Option<&str>) -> Result<Bookmark> {
        let track = self.current_track().ok_or(PlaybackError::NoTrackLoaded)?;
        let label = match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => label.to_owned(),
            None => format!("{} @ {}", track.title, format_time(self.current_time)),
        };

        let bookmark = Bookmark::new(track.key(), self.current_time, label);
        self.bookmarks.add(bookmark.clone())?;
        self.emit(PlaybackEvent::BookmarksChanged {
            count: self.bookmarks.len(),
        });
        Ok(bookmark)
    }

    /// Jump to a bookmark, switching tracks if needed
    ///
    /// A bookmark that cannot be honored leaves playback untouched and is
    /// reported as an error event as well as the returned error.
    pub fn jump_to_bookmark(&mut self, bookmark: &Bookmark) -> Result<()> {
        let result = self.try_jump(bookmark);
        if let Err(e) = &result {
            warn!(id = %bookmark.id, error = %e, "Unable to jump to bookmark");
            self.emit(PlaybackEvent::Error {
                message: e.to_string(),
            });
        }
        result
    }

    fn try_jump(&mut self, bookmark: &Bookmark) -> Result<()> {
        if !bookmark.is_valid() {
            return Err(PlaybackError::InvalidBookmark(bookmark.id.to_string()));
        }

        let index = self
            .tracks
            .iter()
            .position(|t| t.matches_key(&bookmark.track_key))
            .ok_or_else(|| PlaybackError::BookmarkTrackMissing(bookmark.track_key.clone()))?;
        if !self.tracks[index].is_playable() {
            return Err(PlaybackError::TrackUnavailable(bookmark.track_key.clone()));
        }

        if index == self.track_index && self.binding.is_bound() {
            self.seek(bookmark.time_seconds);
            return Ok(());
        }

        let target = self.tracks[index].key().to_owned();
        self.pending_jump
            .set(PendingJump::new(bookmark.time_seconds), &target);
        self.switch_to(index, self.config.autoplay_on_navigate, true)
    }

    /// Delete a bookmark; returns whether it existed
    pub fn delete_bookmark(&mut self, id: &BookmarkId) -> Result<bool> {
        let deleted = self.bookmarks.delete(id)?;
        if deleted {
            self.emit(PlaybackEvent::BookmarksChanged {
                count: self.bookmarks.len(),
            });
        }
        Ok(deleted)
    }

    pub fn clear_bookmarks(&mut self) -> Result<()> {
        self.bookmarks.clear()?;
        self.emit(PlaybackEvent::BookmarksChanged { count: 0 });
        Ok(())
    }

    // ===== State Queries =====

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.track_index)
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration of the bound track, once known
    pub fn duration(&self) -> Option<f64> {
        self.binding.duration()
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Muted or at zero volume
    pub fn is_silent(&self) -> bool {
        self.volume.is_silent()
    }

    /// Catalog loading, or current source waiting for metadata
    pub fn loading(&self) -> bool {
        self.catalog_loading
            || (self.current_track().is_some_and(Track::is_playable) && !self.binding.is_ready())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.all()
    }

    pub fn bookmarks_for_track(&self, track_key: &str) -> Vec<&Bookmark> {
        self.bookmarks.for_track(track_key)
    }

    pub fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Derived status
    pub fn status(&self) -> PlayerStatus {
        if self.catalog_loading && self.tracks.is_empty() {
            return PlayerStatus::Loading;
        }
        if self.error.is_some() {
            return PlayerStatus::Error;
        }
        let Some(track) = self.current_track() else {
            return PlayerStatus::NoTrack;
        };
        if !track.is_playable() {
            return PlayerStatus::Unavailable;
        }
        if !self.binding.is_ready() {
            return PlayerStatus::Loading;
        }
        if self.ended && !self.transport.intent_playing() {
            return PlayerStatus::Ended;
        }

        match self.transport {
            Transport::Paused => PlayerStatus::Paused,
            Transport::PlayRequested => PlayerStatus::PlayRequested,
            Transport::Playing => PlayerStatus::Playing,
        }
    }

    /// Snapshot for display
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            status: self.status(),
            track_index: self.track_index,
            track_key: self.current_key().map(str::to_owned),
            intent_playing: self.transport.intent_playing(),
            actually_playing: self.transport.actually_playing(),
            current_time: self.current_time,
            duration: self.duration(),
            speed: self.speed,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            loading: self.loading(),
            error: self.error.clone(),
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Internals =====

    fn current_key(&self) -> Option<&str> {
        self.current_track().map(Track::key)
    }

    fn bind_current(&mut self) {
        self.reset_timer();
        self.ended = false;

        let Some(url) = self.current_track().and_then(|t| t.audio_url.clone()) else {
            debug!(track_key = ?self.current_key(), "Track has no audio; unbinding");
            self.binding.unbind();
            self.transport = Transport::Paused;
            return;
        };

        if let BindOutcome::Unchanged(token) = self.binding.bind(&url) {
            debug!(token = %token, "Source already bound");
            if let Some(duration) = self.binding.duration() {
                self.on_metadata_ready(duration);
            }
        }
    }

    /// Save progress for the bound track under the key captured now
    fn save_progress(&mut self) {
        if self.ended {
            return;
        }
        let Some(duration) = self.binding.duration() else {
            return;
        };
        let Some(key) = self.current_key().map(str::to_owned) else {
            return;
        };

        let time = self.current_time;
        match self.progress.save(&key, time, Some(duration)) {
            SaveOutcome::Saved => {
                self.last_saved_at = time;
                self.emit(PlaybackEvent::ProgressSaved {
                    track_key: key,
                    seconds: time,
                });
            }
            SaveOutcome::Cleared => {
                self.last_saved_at = time;
                self.emit(PlaybackEvent::ProgressCleared { track_key: key });
            }
            SaveOutcome::Skipped | SaveOutcome::Failed => {}
        }
    }

    fn reset_timer(&mut self) {
        self.current_time = 0.0;
        self.last_saved_at = 0.0;
    }

    fn set_error(&mut self, message: String) {
        self.emit(PlaybackEvent::Error {
            message: message.clone(),
        });
        self.error = Some(message);
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::PositionChanged {
            position: self.current_time,
            duration: self.binding.duration(),
        });
    }

    fn emit_track_changed(&mut self, previous_track_key: Option<String>) {
        if let Some(key) = self.current_key().map(str::to_owned) {
            self.emit(PlaybackEvent::TrackChanged {
                index: self.track_index,
                track_key: key,
                previous_track_key,
            });
        }
    }

    fn sync_status(&mut self) {
        let status = self.status();
        if status != self.last_status {
            debug!(from = ?self.last_status, to = ?status, "Status changed");
            self.last_status = status;
            self.emit(PlaybackEvent::StatusChanged { status });
        }
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("status", &self.status())
            .field("track_index", &self.track_index)
            .field("tracks", &self.tracks.len())
            .field("current_time", &self.current_time)
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}
