//! Shared test fixtures: a scripted media resource and a small catalog

#![allow(dead_code)]

use earshot_core::{StorageAdapter, Track};
use earshot_playback::{
    MediaEvent, MediaEventKind, MediaResource, PlaybackConfig, PlaybackController, SourceToken,
};
use earshot_storage::MemoryStorage;
use std::sync::{Arc, Mutex};

/// Command received by the fake resource
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Attach(SourceToken, String),
    Detach(SourceToken),
    Play,
    Pause,
    Seek(f64),
    Rate(f64),
    Volume(f64),
    Muted(bool),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub commands: Vec<Command>,
    pub token: Option<SourceToken>,
    pub url: Option<String>,
}

/// Media resource that records commands; tests play the resource's part
#[derive(Debug, Clone, Default)]
pub struct FakeMedia {
    state: Arc<Mutex<FakeState>>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token of the currently attached source
    pub fn token(&self) -> SourceToken {
        self.state
            .lock()
            .unwrap()
            .token
            .expect("no source attached")
    }

    pub fn url(&self) -> Option<String> {
        self.state.lock().unwrap().url.clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.lock().unwrap().commands.clear();
    }

    pub fn last_seek(&self) -> Option<f64> {
        self.commands().iter().rev().find_map(|c| match c {
            Command::Seek(t) => Some(*t),
            _ => None,
        })
    }

    pub fn count(&self, command: &Command) -> usize {
        self.commands().iter().filter(|c| *c == command).count()
    }

    /// Event for the currently attached source
    pub fn event(&self, kind: MediaEventKind) -> MediaEvent {
        MediaEvent::new(self.token(), kind)
    }
}

impl MediaResource for FakeMedia {
    fn attach(&mut self, token: SourceToken, url: &str) {
        let mut state = self.state.lock().unwrap();
        state.token = Some(token);
        state.url = Some(url.to_string());
        state.commands.push(Command::Attach(token, url.to_string()));
    }

    fn detach(&mut self, token: SourceToken) {
        let mut state = self.state.lock().unwrap();
        if state.token == Some(token) {
            state.token = None;
            state.url = None;
        }
        state.commands.push(Command::Detach(token));
    }

    fn play(&mut self) {
        self.state.lock().unwrap().commands.push(Command::Play);
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().commands.push(Command::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.state.lock().unwrap().commands.push(Command::Seek(seconds));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.state.lock().unwrap().commands.push(Command::Rate(rate));
    }

    fn set_volume(&mut self, volume: f64) {
        self.state.lock().unwrap().commands.push(Command::Volume(volume));
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.lock().unwrap().commands.push(Command::Muted(muted));
    }
}

/// Three playable tracks, ordered
pub fn three_tracks() -> Vec<Track> {
    vec![
        Track::new("1", "Arrival")
            .with_slug("arrival")
            .with_order(1)
            .with_audio_url("https://cdn.example.com/arrival.mp3"),
        Track::new("2", "Body Scan")
            .with_slug("body-scan")
            .with_order(2)
            .with_audio_url("https://cdn.example.com/body-scan.mp3"),
        Track::new("3", "Closing")
            .with_slug("closing")
            .with_order(3)
            .with_audio_url("https://cdn.example.com/closing.mp3"),
    ]
}

pub struct Harness {
    pub controller: PlaybackController,
    pub media: FakeMedia,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlaybackConfig::default())
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(config: PlaybackConfig, storage: Arc<MemoryStorage>) -> Self {
        let media = FakeMedia::new();
        let shared: Arc<dyn StorageAdapter> = storage.clone();
        let controller = PlaybackController::new(config, shared, Box::new(media.clone()));
        Self {
            controller,
            media,
            storage,
        }
    }

    /// Install a catalog synchronously
    pub fn load(&mut self, tracks: Vec<Track>) {
        let ticket = self
            .controller
            .begin_catalog_load(earshot_core::CatalogFilter::All);
        assert!(self.controller.finish_catalog_load(ticket, Ok(tracks)));
    }

    /// Deliver an event for the currently attached source
    pub fn send(&mut self, kind: MediaEventKind) {
        let event = self.media.event(kind);
        self.controller.handle_media_event(event);
    }

    pub fn metadata(&mut self, duration: f64) {
        self.send(MediaEventKind::MetadataReady { duration });
    }

    pub fn confirm(&mut self) {
        self.send(MediaEventKind::PlayConfirmed);
    }

    pub fn time(&mut self, position: f64) {
        self.send(MediaEventKind::TimeUpdate { position });
    }
}
