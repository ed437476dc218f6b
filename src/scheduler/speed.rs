pub const DEFAULT_MIN_WPM: u32 = 100;
pub const DEFAULT_MAX_WPM: u32 = 1000;
pub const DEFAULT_WPM_STEP: u32 = 25;

/// Allowed speed range and the increment used by speed up / slow down.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpeedBounds {
    min_wpm: u32,
    max_wpm: u32,
    step_wpm: u32,
}

impl SpeedBounds {
    /// Swaps inverted bounds and raises a zero minimum or step to 1.
    pub fn new(min_wpm: u32, max_wpm: u32, step_wpm: u32) -> Self {
        let (lo, hi) = if min_wpm <= max_wpm {
            (min_wpm, max_wpm)
        } else {
            (max_wpm, min_wpm)
        };

        Self {
            min_wpm: lo.max(1),
            max_wpm: hi.max(1),
            step_wpm: step_wpm.max(1),
        }
    }

    pub fn min_wpm(&self) -> u32 {
        self.min_wpm
    }

    pub fn max_wpm(&self) -> u32 {
        self.max_wpm
    }

    pub fn step_wpm(&self) -> u32 {
        self.step_wpm
    }

    pub fn clamp(&self, wpm: i64) -> u32 {
        let clamped = wpm.clamp(i64::from(self.min_wpm), i64::from(self.max_wpm));
        // within [min, max], both of which are u32
        clamped as u32
    }

    pub fn contains(&self, wpm: i64) -> bool {
        (i64::from(self.min_wpm)..=i64::from(self.max_wpm)).contains(&wpm)
    }
}

impl Default for SpeedBounds {
    fn default() -> Self {
        Self {
            min_wpm: DEFAULT_MIN_WPM,
            max_wpm: DEFAULT_MAX_WPM,
            step_wpm: DEFAULT_WPM_STEP,
        }
    }
}
