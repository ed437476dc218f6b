use super::state::{PlaybackPhase, ReadingMode};
use crate::bionic::BionicWord;
use crate::chunking::Chunk;

/// Read-only view of a pacer, taken once per render or poll.
///
/// Word and bionic fields are filled in word and bionic modes; the chunk
/// fields (with their neighbours, for a three-pane context view) in chunk
/// mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub mode: ReadingMode,
    pub phase: PlaybackPhase,
    pub speed_wpm: u32,
    pub is_paused: bool,
    pub is_playing: bool,
    pub is_complete: bool,
    pub position: usize,
    pub total_items: usize,
    pub progress: f64,
    pub elapsed_secs: u64,
    /// Time left at the current speed if playback ran uninterrupted
    pub remaining_secs: u64,
    pub current_word: Option<String>,
    pub current_bionic: Option<BionicWord>,
    pub previous_chunk: Option<Chunk>,
    pub current_chunk: Option<Chunk>,
    pub next_chunk: Option<Chunk>,
}

