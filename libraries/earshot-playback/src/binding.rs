//! Media binding
//!
//! The only owner of the media resource. Binds one source at a time, drops
//! events from superseded sources, and defers `play` until the source is
//! ready.

use crate::media::{MediaEvent, MediaEventKind, MediaResource, SourceToken};
use tracing::{debug, info};

/// What a bind request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// A new source was attached and is loading
    Attached(SourceToken),

    /// The URL is already bound; nothing was reloaded
    Unchanged(SourceToken),
}

#[derive(Debug)]
struct BoundSource {
    token: SourceToken,
    url: String,
    duration: Option<f64>,
}

/// Scoped binding between the controller and one media resource
///
/// The resource is attached on bind and detached on rebind, unbind, and drop,
/// so no events leak across track switches.
pub struct MediaBinding {
    resource: Box<dyn MediaResource>,
    bound: Option<BoundSource>,
    next_token: u64,
}

impl MediaBinding {
    pub fn new(resource: Box<dyn MediaResource>) -> Self {
        Self {
            resource,
            bound: None,
            next_token: 0,
        }
    }

    /// Bind `url`, keeping the current source when it is already bound
    pub fn bind(&mut self, url: &str) -> BindOutcome {
        match &self.bound {
            Some(bound) if bound.url == url => BindOutcome::Unchanged(bound.token),
            _ => BindOutcome::Attached(self.attach(url)),
        }
    }

    /// Bind `url` with a fresh token even if it is already bound
    pub fn rebind(&mut self, url: &str) -> SourceToken {
        self.attach(url)
    }

    /// Release the current source, if any
    pub fn unbind(&mut self) {
        if let Some(bound) = self.bound.take() {
            debug!(token = %bound.token, url = %bound.url, "Detaching media source");
            self.resource.detach(bound.token);
        }
    }

    fn attach(&mut self, url: &str) -> SourceToken {
        self.unbind();

        self.next_token += 1;
        let token = SourceToken::new(self.next_token);
        info!(token = %token, url = %url, "Attaching media source");

        self.resource.attach(token, url);
        self.bound = Some(BoundSource {
            token,
            url: url.to_string(),
            duration: None,
        });
        token
    }

    /// Token of the bound source
    pub fn token(&self) -> Option<SourceToken> {
        self.bound.as_ref().map(|b| b.token)
    }

    /// URL of the bound source
    pub fn url(&self) -> Option<&str> {
        self.bound.as_ref().map(|b| b.url.as_str())
    }

    /// Whether a source is bound
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Whether the bound source has reported its metadata
    pub fn is_ready(&self) -> bool {
        self.duration().is_some()
    }

    /// Duration reported by the bound source
    pub fn duration(&self) -> Option<f64> {
        self.bound.as_ref().and_then(|b| b.duration)
    }

    /// Validate an incoming event against the bound source
    ///
    /// Returns `None` for events from any other source. Metadata updates the
    /// binding's readiness before the event is handed on.
    pub fn accept(&mut self, event: MediaEvent) -> Option<MediaEventKind> {
        let Some(bound) = self.bound.as_mut() else {
            debug!(token = %event.token, "Dropping media event: nothing bound");
            return None;
        };

        if bound.token != event.token {
            debug!(
                token = %event.token,
                bound = %bound.token,
                kind = ?event.kind,
                "Dropping stale media event"
            );
            return None;
        }

        if let MediaEventKind::MetadataReady { duration } = &event.kind {
            // Streams without a finite length are treated as zero-length
            let duration = if duration.is_finite() && *duration > 0.0 {
                *duration
            } else {
                0.0
            };
            bound.duration = Some(duration);
            return Some(MediaEventKind::MetadataReady { duration });
        }

        Some(event.kind)
    }

    /// Issue `play` if the source is ready; returns whether it was issued
    pub fn play(&mut self) -> bool {
        if self.is_ready() {
            self.resource.play();
            true
        } else {
            false
        }
    }

    pub fn pause(&mut self) {
        if self.is_bound() {
            self.resource.pause();
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if self.is_ready() {
            self.resource.seek(seconds);
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if self.is_ready() {
            self.resource.set_playback_rate(rate);
        }
    }

    /// Volume and mute apply even before the source is ready
    pub fn set_volume(&mut self, level: f64, muted: bool) {
        self.resource.set_volume(level);
        self.resource.set_muted(muted);
    }
}

impl Drop for MediaBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl std::fmt::Debug for MediaBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBinding")
            .field("bound", &self.bound)
            .field("next_token", &self.next_token)
            .finish_non_exhaustive()
    }
}
