use crate::bionic::{transform_words, BionicWord};
use crate::chunking::{chunk_words, Chunk};
use crate::segment::split_words;
use crate::session::SessionConfig;

/// The three segmentations of a session's text, computed once up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Streams {
    pub words: Vec<String>,
    pub chunks: Vec<Chunk>,
    /// Index-aligned with `words`
    pub bionic: Vec<BionicWord>,
}

impl Streams {
    pub fn derive(config: &SessionConfig) -> Self {
        let words = split_words(&config.text);
        let chunks = chunk_words(
            &words,
            config.chunk_size,
            config.chunk_strategy,
            &config.starters,
        );
        let bionic = transform_words(&words);

        log::debug!(
            "derived {} words, {} chunks ({} strategy, size {})",
            words.len(),
            chunks.len(),
            config.chunk_strategy,
            config.chunk_size
        );

        Self {
            words,
            chunks,
            bionic,
        }
    }
}
