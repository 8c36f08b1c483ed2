/// Progress and pending-jump records
use serde::{Deserialize, Serialize};

/// Last known playback position of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub track_key: String,
    pub time_seconds: f64,
}

impl ProgressRecord {
    pub fn new(track_key: impl Into<String>, time_seconds: f64) -> Self {
        Self {
            track_key: track_key.into(),
            time_seconds,
        }
    }

    /// Encode the stored value (seconds as a string)
    pub fn encode(&self) -> String {
        encode_seconds(self.time_seconds)
    }
}

/// One-shot request to seek once the bound track's duration is known
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingJump {
    pub time_seconds: f64,
}

impl PendingJump {
    pub fn new(time_seconds: f64) -> Self {
        Self { time_seconds }
    }

    /// Encode the stored value (seconds as a string)
    pub fn encode(&self) -> String {
        encode_seconds(self.time_seconds)
    }

    /// Decode a stored value, rejecting anything that is not a usable time
    pub fn decode(raw: &str) -> Option<Self> {
        decode_seconds(raw).map(Self::new)
    }
}

/// Seconds are stored with millisecond precision
pub(crate) fn encode_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// Parse stored seconds; negative or non-finite values are treated as absent
pub fn decode_seconds(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
