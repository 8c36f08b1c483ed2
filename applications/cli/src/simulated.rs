//! Simulated media resource
//!
//! Stands in for an audio element. Nothing is decoded; a clock handle moves
//! the playhead and reports the lifecycle events a real element would.

use earshot_playback::{MediaEvent, MediaEventKind, MediaResource, SourceToken};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

#[derive(Debug)]
struct SimState {
    track_length: f64,
    token: Option<SourceToken>,
    position: f64,
    rate: f64,
    playing: bool,
    volume: f64,
    muted: bool,
    events: Vec<MediaEvent>,
}

impl SimState {
    fn push(&mut self, kind: MediaEventKind) {
        if let Some(token) = self.token {
            self.events.push(MediaEvent::new(token, kind));
        }
    }
}

type Shared = Arc<Mutex<SimState>>;

fn lock(state: &Shared) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Media resource half, owned by the controller
#[derive(Debug)]
pub struct SimulatedMedia {
    state: Shared,
}

/// Clock half, kept by the session driver
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    state: Shared,
}

impl SimulatedMedia {
    /// Create a resource whose sources all last `track_length` seconds
    pub fn new(track_length: f64) -> (Self, SimulatedClock) {
        let state = Arc::new(Mutex::new(SimState {
            track_length: track_length.max(0.0),
            token: None,
            position: 0.0,
            rate: 1.0,
            playing: false,
            volume: 1.0,
            muted: false,
            events: Vec::new(),
        }));

        (
            Self {
                state: state.clone(),
            },
            SimulatedClock { state },
        )
    }
}

impl MediaResource for SimulatedMedia {
    fn attach(&mut self, token: SourceToken, url: &str) {
        trace!(token = %token, url = %url, "sim: attach");
        let mut state = lock(&self.state);
        state.token = Some(token);
        state.position = 0.0;
        state.playing = false;
        let duration = state.track_length;
        state.push(MediaEventKind::MetadataReady { duration });
    }

    fn detach(&mut self, token: SourceToken) {
        let mut state = lock(&self.state);
        if state.token == Some(token) {
            state.token = None;
            state.playing = false;
        }
    }

    fn play(&mut self) {
        let mut state = lock(&self.state);
        if state.token.is_none() {
            return;
        }
        if state.position >= state.track_length {
            state.position = 0.0;
        }
        state.playing = true;
        state.push(MediaEventKind::PlayConfirmed);
    }

    fn pause(&mut self) {
        let mut state = lock(&self.state);
        if state.playing {
            state.playing = false;
            state.push(MediaEventKind::Paused);
        }
    }

    fn seek(&mut self, seconds: f64) {
        let mut state = lock(&self.state);
        state.position = seconds.clamp(0.0, state.track_length);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        lock(&self.state).rate = rate;
    }

    fn set_volume(&mut self, volume: f64) {
        lock(&self.state).volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        lock(&self.state).muted = muted;
    }
}

impl SimulatedClock {
    /// Events reported since the last call, without moving time
    pub fn take_events(&self) -> Vec<MediaEvent> {
        std::mem::take(&mut lock(&self.state).events)
    }

    /// Move wall-clock time forward by `seconds` and report what happened
    pub fn advance(&self, seconds: f64) -> Vec<MediaEvent> {
        let mut state = lock(&self.state);
        if state.playing && state.token.is_some() {
            let position = state.position + seconds * state.rate;
            if position >= state.track_length {
                state.position = state.track_length;
                state.playing = false;
                let end = state.track_length;
                state.push(MediaEventKind::TimeUpdate { position: end });
                state.push(MediaEventKind::Ended);
            } else {
                state.position = position;
                state.push(MediaEventKind::TimeUpdate { position });
            }
        }
        std::mem::take(&mut state.events)
    }

    /// Playhead of the attached source
    pub fn position(&self) -> f64 {
        lock(&self.state).position
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.state).playing
    }

    /// Gain currently applied
    pub fn gain(&self) -> f64 {
        let state = lock(&self.state);
        if state.muted {
            0.0
        } else {
            state.volume
        }
    }
}
