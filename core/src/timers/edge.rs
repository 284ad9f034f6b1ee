//! One-scan edge pulses
//!
//! A `OneShot` watches a boolean level once per scan and reports a pulse on
//! the scan where the level rises or falls. The arming latches are re-armed
//! on every sample, so each transition yields exactly one fresh pulse.

/// Rising/falling one-scan pulse generator for a single boolean signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OneShot {
    rose: bool,
    fell: bool,
    rising_armed: bool,
    falling_armed: bool,
}

impl OneShot {
    /// Create a one-shot armed for the transition away from `level`.
    pub fn armed_for(level: bool) -> Self {
        Self {
            rose: false,
            fell: false,
            rising_armed: !level,
            falling_armed: level,
        }
    }

    /// Sample the signal for this scan and update both pulses.
    pub fn sample(&mut self, level: bool) {
        self.rose = level && self.rising_armed;
        self.rising_armed = !level;

        self.fell = !level && self.falling_armed;
        self.falling_armed = level;
    }

    /// True on the scan the level went false -> true
    pub fn rose(&self) -> bool {
        self.rose
    }

    /// True on the scan the level went true -> false
    pub fn fell(&self) -> bool {
        self.fell
    }

    /// True on any transition this scan
    pub fn changed(&self) -> bool {
        self.rose || self.fell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_pulse_lasts_one_sample() {
        let mut os = OneShot::armed_for(false);
        os.sample(false);
        assert!(!os.rose());
        os.sample(true);
        assert!(os.rose());
        assert!(!os.fell());
        os.sample(true);
        assert!(!os.rose(), "pulse must clear on the next scan");
    }

    #[test]
    fn test_falling_pulse_lasts_one_sample() {
        let mut os = OneShot::armed_for(true);
        os.sample(true);
        assert!(!os.fell());
        os.sample(false);
        assert!(os.fell());
        assert!(!os.rose());
        os.sample(false);
        assert!(!os.fell());
    }

    #[test]
    fn test_rearms_for_repeated_transitions() {
        let mut os = OneShot::armed_for(false);
        let mut rises = 0;
        let mut falls = 0;
        for level in [true, false, true, false, true] {
            os.sample(level);
            rises += os.rose() as u32;
            falls += os.fell() as u32;
            assert!(!(os.rose() && os.fell()));
        }
        assert_eq!(rises, 3);
        assert_eq!(falls, 2);
    }

    #[test]
    fn test_default_is_unarmed() {
        let mut os = OneShot::default();
        os.sample(true);
        assert!(!os.changed(), "unarmed one-shot ignores the first level");
        os.sample(false);
        assert!(os.fell());
    }
}
