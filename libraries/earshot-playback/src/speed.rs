//! Playback speed
//!
//! A fixed, ordered set of rates. `next()` cycles through them and wraps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Playback rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Speed {
    /// 1x
    #[default]
    Normal,

    /// 1.25x
    Quarter,

    /// 1.5x
    Half,

    /// 2x
    Double,
}

impl Speed {
    /// Every speed, in cycling order
    pub const ALL: [Speed; 4] = [Speed::Normal, Speed::Quarter, Speed::Half, Speed::Double];

    /// Rate multiplier applied to the media resource
    pub fn rate(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Quarter => 1.25,
            Self::Half => 1.5,
            Self::Double => 2.0,
        }
    }

    /// Next speed in the cycle, wrapping back to 1x after 2x
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Quarter,
            Self::Quarter => Self::Half,
            Self::Half => Self::Double,
            Self::Double => Self::Normal,
        }
    }

    /// Look up a speed by rate
    pub fn from_rate(rate: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| (s.rate() - rate).abs() < 1e-9)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.rate())
    }
}

impl From<Speed> for f64 {
    fn from(speed: Speed) -> Self {
        speed.rate()
    }
}

impl TryFrom<f64> for Speed {
    type Error = String;

    fn try_from(rate: f64) -> Result<Self, Self::Error> {
        Self::from_rate(rate).ok_or_else(|| {
            format!("unsupported playback speed {rate}, expected one of 1, 1.25, 1.5, 2")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_in_order_and_wraps() {
        let mut speed = Speed::Normal;
        let mut visited = vec![speed.rate()];
        for _ in 0..4 {
            speed = speed.next();
            visited.push(speed.rate());
        }
        assert_eq!(visited, vec![1.0, 1.25, 1.5, 2.0, 1.0]);
    }

    #[test]
    fn display() {
        assert_eq!(Speed::Normal.to_string(), "1x");
        assert_eq!(Speed::Quarter.to_string(), "1.25x");
        assert_eq!(Speed::Double.to_string(), "2x");
    }

    #[test]
    fn parses_from_rate() {
        assert_eq!(Speed::try_from(1.5), Ok(Speed::Half));
        assert!(Speed::try_from(3.0).is_err());
    }

    #[test]
    fn serde_uses_numeric_rate() {
        assert_eq!(serde_json::to_string(&Speed::Quarter).unwrap(), "1.25");
        let parsed: Speed = serde_json::from_str("2.0").unwrap();
        assert_eq!(parsed, Speed::Double);
        assert!(serde_json::from_str::<Speed>("0.5").is_err());
    }
}
