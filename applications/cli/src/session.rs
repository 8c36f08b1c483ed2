//! Simulated listening session
//!
//! Drives a [`PlaybackController`] against the simulated media resource the
//! way a UI would: load the catalog, optionally seek, play for a while, then
//! pause so progress is flushed.

use crate::simulated::{SimulatedClock, SimulatedMedia};
use earshot_core::{Bookmark, CatalogFilter, StorageAdapter, TrackCatalog};
use earshot_playback::{
    MediaEvent, PlaybackConfig, PlaybackController, PlaybackEvent, PlayerStatus, Speed,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// What to listen to and for how long
#[derive(Debug, Clone)]
pub struct ListenOptions {
    /// Track key; the full catalog when absent
    pub track: Option<String>,
    /// Simulated seconds of wall-clock time
    pub seconds: f64,
    /// Clock resolution
    pub step_secs: f64,
    /// Position to seek to before playing
    pub seek: Option<f64>,
    /// Speed override
    pub speed: Option<Speed>,
    /// Save a bookmark at the end; empty for the default label
    pub bookmark: Option<String>,
    /// Length reported for every simulated source
    pub track_length: f64,
    /// Sleep for each step instead of running as fast as possible
    pub realtime: bool,
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self {
            track: None,
            seconds: 30.0,
            step_secs: 1.0,
            seek: None,
            speed: None,
            bookmark: None,
            track_length: 600.0,
            realtime: false,
        }
    }
}

/// Where the session stopped
#[derive(Debug, Clone)]
pub struct ListenSummary {
    pub track_key: Option<String>,
    pub title: Option<String>,
    pub position: f64,
    pub duration: Option<f64>,
    pub status: PlayerStatus,
    pub tracks_started: usize,
    pub bookmark: Option<Bookmark>,
    pub error: Option<String>,
}

/// Run one session
pub async fn listen(
    storage: Arc<dyn StorageAdapter>,
    catalog: &dyn TrackCatalog,
    config: &PlaybackConfig,
    options: &ListenOptions,
) -> anyhow::Result<ListenSummary> {
    let (media, clock) = SimulatedMedia::new(options.track_length);
    let mut controller = PlaybackController::new(config.clone(), storage, Box::new(media));
    let mut tracks_started = 0;

    let filter = CatalogFilter::from_key(options.track.as_deref());
    let count = controller.load_catalog(catalog, filter).await?;
    info!(tracks = count, "Session ready");
    tracks_started += deliver(&mut controller, &clock, clock.take_events());

    if let Some(speed) = options.speed {
        controller.set_speed(speed);
    }
    if let Some(seconds) = options.seek {
        controller.seek(seconds);
    }

    controller.play_pause();
    deliver(&mut controller, &clock, clock.take_events());

    let step = if options.step_secs > 0.0 {
        options.step_secs
    } else {
        1.0
    };
    let mut elapsed = 0.0;
    while elapsed < options.seconds {
        let dt = step.min(options.seconds - elapsed);
        if options.realtime {
            tokio::time::sleep(Duration::from_secs_f64(dt)).await;
        }
        tracks_started += deliver(&mut controller, &clock, clock.advance(dt));
        elapsed += dt;

        if matches!(
            controller.status(),
            PlayerStatus::NoTrack
                | PlayerStatus::Ended
                | PlayerStatus::Error
                | PlayerStatus::Unavailable
        ) {
            debug!(status = ?controller.status(), "Stopping session early");
            break;
        }
    }

    let bookmark = match options.bookmark.as_deref() {
        Some(label) => Some(controller.save_bookmark(Some(label))?),
        None => None,
    };

    if controller.transport().intent_playing() {
        controller.play_pause();
        deliver(&mut controller, &clock, clock.take_events());
    }

    let track = controller.current_track();
    Ok(ListenSummary {
        track_key: track.map(|t| t.key().to_owned()),
        title: track.map(|t| t.title.clone()),
        position: controller.current_time(),
        duration: controller.duration(),
        status: controller.status(),
        tracks_started,
        bookmark,
        error: controller.error().map(str::to_owned),
    })
}

/// Feed media events until the resource goes quiet
///
/// Returns how many track changes happened.
fn deliver(
    controller: &mut PlaybackController,
    clock: &SimulatedClock,
    mut batch: Vec<MediaEvent>,
) -> usize {
    let mut track_changes = 0;

    loop {
        for event in batch {
            controller.handle_media_event(event);
        }
        for event in controller.drain_events() {
            if matches!(event, PlaybackEvent::TrackChanged { .. }) {
                track_changes += 1;
            }
            log_event(&event);
        }

        batch = clock.take_events();
        if batch.is_empty() {
            break;
        }
    }

    track_changes
}

fn log_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::StatusChanged { status } => info!(?status, "Status"),
        PlaybackEvent::TrackChanged { index, track_key, .. } => {
            info!(index, track_key = %track_key, "Now playing");
        }
        PlaybackEvent::Restored {
            source, position, ..
        } => info!(?source, seconds = position, "Start position"),
        PlaybackEvent::PositionChanged { position, .. } => trace!(seconds = position, "Position"),
        PlaybackEvent::Error { message } => warn!(error = %message, "Playback error"),
        other => debug!(event = ?other, "Playback event"),
    }
}
