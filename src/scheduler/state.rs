use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which stream the pacer steps through.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    #[default]
    Word,
    Bionic,
    Chunk,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Paused,
    Complete,
}

/// Mutable playback state, owned by exactly one pacer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub mode: ReadingMode,
    pub speed_wpm: u32,
    pub position: usize,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_complete: bool,
    pub elapsed_secs: u64,
}

impl PlaybackState {
    pub fn idle(mode: ReadingMode, speed_wpm: u32) -> Self {
        Self {
            mode,
            speed_wpm,
            position: 0,
            is_playing: false,
            is_paused: true,
            is_complete: false,
            elapsed_secs: 0,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        match (self.is_complete, self.is_playing, self.is_paused) {
            (true, _, _) => PlaybackPhase::Complete,
            (false, false, _) => PlaybackPhase::Idle,
            (false, true, true) => PlaybackPhase::Paused,
            (false, true, false) => PlaybackPhase::Playing,
        }
    }

    /// The only state in which the advance timer may be armed.
    pub fn is_running(&self) -> bool {
        self.phase() == PlaybackPhase::Playing
    }
}
