//! Volume control
//!
//! Volume is a linear level in `[0, 1]`. Mute is tracked independently of the
//! level so un-muting restores what the listener had before.

use earshot_core::clamp_unit;

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Last non-zero level, restored when un-muting from zero
    last_audible: f64,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to 0.0-1.0
    pub fn new(level: f64) -> Self {
        let level = clamp_unit(level);

        Self {
            level,
            muted: false,
            last_audible: if level > 0.0 { level } else { 1.0 },
        }
    }

    /// Set volume level, clamped to 0.0-1.0
    pub fn set_level(&mut self, level: f64) {
        self.level = clamp_unit(level);
        if self.level > 0.0 {
            self.last_audible = self.level;
        }
    }

    /// Get current volume level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Explicit mute flag
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Muted for display purposes: explicitly muted, or level at zero
    pub fn is_silent(&self) -> bool {
        self.muted || self.level == 0.0
    }

    /// Toggle mute state
    ///
    /// When silent, un-mutes and brings a zero level back to the last
    /// non-zero level. Otherwise mutes and keeps the level.
    pub fn toggle_mute(&mut self) {
        if self.is_silent() {
            self.muted = false;
            if self.level == 0.0 {
                self.level = self.last_audible;
            }
        } else {
            self.muted = true;
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        vol.set_level(-0.5);
        assert_eq!(vol.level(), 0.0);

        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);

        vol.set_level(f64::NAN);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn zero_level_is_silent_but_not_muted() {
        let mut vol = Volume::new(0.6);
        vol.set_level(0.0);
        assert!(vol.is_silent());
        assert!(!vol.is_muted());
    }

    #[test]
    fn unmute_from_zero_restores_last_level() {
        let mut vol = Volume::new(0.6);
        vol.set_level(0.0);

        vol.toggle_mute();
        assert!(!vol.is_silent());
        assert_eq!(vol.level(), 0.6);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.7);

        vol.toggle_mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.7);
        assert!(vol.is_silent());

        vol.toggle_mute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.7);
    }

    #[test]
    fn starting_at_zero_unmutes_to_full() {
        let mut vol = Volume::new(0.0);
        vol.toggle_mute();
        assert_eq!(vol.level(), 1.0);
    }
}
