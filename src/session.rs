use crate::chunking::{ChunkStrategy, PhraseStarters};
use crate::scheduler::{ReadingMode, SpeedBounds};

pub const DEFAULT_WPM: u32 = 300;
pub const DEFAULT_CHUNK_SIZE: usize = 3;

/// Everything a reading session is created from. Never mutated once the
/// pacer owns it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub text: String,
    pub mode: ReadingMode,
    pub initial_speed_wpm: u32,
    pub chunk_size: usize,
    pub chunk_strategy: ChunkStrategy,
    pub starters: PhraseStarters,
    pub speed_bounds: SpeedBounds,
}

impl SessionConfig {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: ReadingMode::Word,
            initial_speed_wpm: DEFAULT_WPM,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_strategy: ChunkStrategy::Phrase,
            starters: PhraseStarters::default(),
            speed_bounds: SpeedBounds::default(),
        }
    }

    pub fn with_mode(mut self, mode: ReadingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_speed(mut self, wpm: u32) -> Self {
        self.initial_speed_wpm = wpm;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if chunk_size == 0 {
            log::warn!("chunk size 0 is not usable, falling back to 1");
        }
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_smart_chunking(mut self, use_smart_chunking: bool) -> Self {
        self.chunk_strategy = ChunkStrategy::from_smart(use_smart_chunking);
        self
    }

    /// Picks a bundled phrase-starter list, keeping the current one when the
    /// language is unknown.
    pub fn with_language(mut self, language: &str) -> Self {
        match PhraseStarters::bundled(language) {
            Some(starters) => self.starters = starters,
            None => log::warn!(
                "no phrase starters bundled for {language}, keeping {}",
                self.starters.name
            ),
        }
        self
    }

    pub fn with_starters(mut self, starters: PhraseStarters) -> Self {
        self.starters = starters;
        self
    }

    pub fn with_speed_bounds(mut self, bounds: SpeedBounds) -> Self {
        self.speed_bounds = bounds;
        self
    }
}
