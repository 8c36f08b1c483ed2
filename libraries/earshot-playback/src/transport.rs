//! Transport state machine
//!
//! Separates what the listener asked for (intent) from what the media
//! resource confirmed (actual). Starting playback is asynchronous and can be
//! refused, so `PlayRequested` sits between `Paused` and `Playing` until the
//! resource answers.
//!
//! | state \ input   | Play          | Pause          | Confirmed        | Rejected | ResourcePaused | Ended  | Failed |
//! |-----------------|---------------|----------------|------------------|----------|----------------|--------|--------|
//! | `Paused`        | Requested+play| Paused         | Paused+pause     | Paused   | Paused         | Paused | Paused |
//! | `PlayRequested` | Requested     | Paused+pause   | Playing          | Paused   | Paused         | Paused | Paused |
//! | `Playing`       | Playing       | Paused+pause   | Playing          | Paused   | Paused         | Paused | Paused |

use serde::{Deserialize, Serialize};

/// Intent/actual play state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transport {
    /// Not playing and not asked to
    #[default]
    Paused,

    /// Asked to play, awaiting confirmation from the resource
    PlayRequested,

    /// Asked to play and confirmed
    Playing,
}

/// Something that moves the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportInput {
    /// Listener asked to play
    Play,
    /// Listener asked to pause
    Pause,
    /// Resource confirmed playback started
    Confirmed,
    /// Resource refused to start
    Rejected,
    /// Resource paused on its own
    ResourcePaused,
    /// Resource reached end of media
    Ended,
    /// Resource reported a failure
    Failed,
}

/// Command the binding must issue on the resource after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCommand {
    Play,
    Pause,
}

/// Result of applying an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Transport,
    pub command: Option<ResourceCommand>,
}

impl Transition {
    fn to(next: Transport) -> Self {
        Self {
            next,
            command: None,
        }
    }

    fn with(next: Transport, command: ResourceCommand) -> Self {
        Self {
            next,
            command: Some(command),
        }
    }
}

impl Transport {
    /// Listener wants audio
    pub fn intent_playing(self) -> bool {
        !matches!(self, Self::Paused)
    }

    /// Resource confirmed audio
    pub fn actually_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Apply an input according to the transition table
    pub fn apply(self, input: TransportInput) -> Transition {
        use ResourceCommand as Cmd;
        use Transport::{Paused, PlayRequested, Playing};
        use TransportInput as In;

        match (self, input) {
            (Paused, In::Play) => Transition::with(PlayRequested, Cmd::Play),
            // Confirmation for a play the listener already took back
            (Paused, In::Confirmed) => Transition::with(Paused, Cmd::Pause),
            (Paused, _) => Transition::to(Paused),

            (PlayRequested, In::Play) => Transition::to(PlayRequested),
            (PlayRequested, In::Confirmed) => Transition::to(Playing),

            (Playing, In::Play | In::Confirmed) => Transition::to(Playing),

            (PlayRequested | Playing, In::Pause) => Transition::with(Paused, Cmd::Pause),
            (
                PlayRequested | Playing,
                In::Rejected | In::ResourcePaused | In::Ended | In::Failed,
            ) => Transition::to(Paused),
        }
    }
}
