pub mod starters;

use serde::{Deserialize, Serialize};

pub use starters::PhraseStarters;

/// A run of consecutive tokens displayed together as one pacing step.
pub type Chunk = Vec<String>;

const BOUNDARY_PUNCTUATION: [char; 9] = ['.', '!', '?', ',', ';', ':', '—', '–', '-'];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Fixed-size groups of exactly `k` tokens.
    Mechanical,
    /// Groups closed early at phrase starters and clause punctuation.
    Phrase,
}

impl ChunkStrategy {
    pub fn from_smart(use_smart_chunking: bool) -> Self {
        if use_smart_chunking {
            ChunkStrategy::Phrase
        } else {
            ChunkStrategy::Mechanical
        }
    }
}

/// Case-folds a token and drops everything that is not a letter or digit.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn ends_with_boundary_punctuation(token: &str) -> bool {
    token
        .chars()
        .next_back()
        .is_some_and(|c| BOUNDARY_PUNCTUATION.contains(&c))
}

pub fn chunk_words<S: AsRef<str>>(
    words: &[S],
    chunk_size: usize,
    strategy: ChunkStrategy,
    starters: &PhraseStarters,
) -> Vec<Chunk> {
    match strategy {
        ChunkStrategy::Mechanical => chunk_mechanical(words, chunk_size),
        ChunkStrategy::Phrase => chunk_phrases(words, chunk_size, starters),
    }
}

pub fn chunk_mechanical<S: AsRef<str>>(words: &[S], chunk_size: usize) -> Vec<Chunk> {
    words
        .chunks(chunk_size.max(1))
        .map(|group| group.iter().map(|w| w.as_ref().to_owned()).collect())
        .collect()
}

/// Groups tokens into chunks of at most `chunk_size`, preferring to break
/// before phrase starters and after clause punctuation.
///
/// A group is closed before the next token when it is full, or when it holds
/// at least two tokens and either the next token starts a phrase or the last
/// token ends a clause. A full group whose last token ends a clause is closed
/// right away. Groups are never empty.
pub fn chunk_phrases<S: AsRef<str>>(
    words: &[S],
    chunk_size: usize,
    starters: &PhraseStarters,
) -> Vec<Chunk> {
    let limit = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current: Chunk = Vec::with_capacity(limit);

    for word in words.iter().map(AsRef::as_ref) {
        if let Some(last) = current.last() {
            let full = current.len() >= limit;
            let phrase_break = current.len() >= 2
                && (starters.contains(word) || ends_with_boundary_punctuation(last));

            if full || phrase_break {
                chunks.push(std::mem::take(&mut current));
            }
        }

        current.push(word.to_owned());

        if current.len() >= limit && ends_with_boundary_punctuation(word) {
            chunks.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split_words;

    fn sizes(chunks: &[Chunk]) -> Vec<usize> {
        chunks.iter().map(Vec::len).collect()
    }

    #[test]
    fn test_mechanical_three_of_ten() {
        let words: Vec<String> = (0..10).map(|i| format!("w{i}")).collect();
        let chunks = chunk_mechanical(&words, 3);
        assert_eq!(sizes(&chunks), vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_mechanical_sentence() {
        let words = split_words("The quick brown fox jumps");
        let chunks = chunk_mechanical(&words, 3);
        assert_eq!(
            chunks,
            vec![vec!["The", "quick", "brown"], vec!["fox", "jumps"]]
        );
    }

    #[test]
    fn test_mechanical_zero_size_behaves_like_one() {
        let chunks = chunk_mechanical(&["a", "b"], 0);
        assert_eq!(sizes(&chunks), vec![1, 1]);
    }

    #[test]
    fn test_empty_input_has_no_chunks() {
        let none: [&str; 0] = [];
        assert!(chunk_mechanical(&none, 3).is_empty());
        assert!(chunk_phrases(&none, 3, &PhraseStarters::default()).is_empty());
    }

    #[test]
    fn test_phrase_fewer_words_than_size() {
        let chunks = chunk_phrases(&["quick", "brown"], 5, &PhraseStarters::empty());
        assert_eq!(chunks, vec![vec!["quick", "brown"]]);
    }

    #[test]
    fn test_phrase_breaks_before_starter() {
        let words = split_words("the quick brown fox and the lazy dog");
        let chunks = chunk_phrases(&words, 5, &PhraseStarters::default());
        assert_eq!(
            chunks,
            vec![
                vec!["the", "quick", "brown", "fox"],
                vec!["and", "the", "lazy", "dog"],
            ]
        );
    }

    #[test]
    fn test_phrase_starter_needs_two_words_first() {
        // "the" follows a single-word group, so no break yet
        let words = split_words("Then the cat sat");
        let chunks = chunk_phrases(&words, 4, &PhraseStarters::default());
        assert_eq!(sizes(&chunks), vec![4]);
    }

    #[test]
    fn test_phrase_breaks_after_clause_punctuation() {
        let words = split_words("Well said, dear friend; truly");
        let chunks = chunk_phrases(&words, 5, &PhraseStarters::empty());
        assert_eq!(
            chunks,
            vec![
                vec!["Well".to_string(), "said,".into()],
                vec!["dear".into(), "friend;".into()],
                vec!["truly".into()],
            ]
        );
    }

    #[test]
    fn test_phrase_single_word_with_comma_keeps_going() {
        let words = split_words("Yes, we can go");
        let chunks = chunk_phrases(&words, 5, &PhraseStarters::empty());
        assert_eq!(sizes(&chunks), vec![4]);
    }

    #[test]
    fn test_phrase_full_group_ending_in_punctuation_closes() {
        let words = split_words("one two three. four");
        let chunks = chunk_phrases(&words, 3, &PhraseStarters::empty());
        assert_eq!(sizes(&chunks), vec![3, 1]);
    }

    #[test]
    fn test_phrase_never_exceeds_size() {
        let words = split_words(
            "In the beginning, there was nothing but a long and quiet road that ran \
             through the hills; and then, without warning, the storm arrived.",
        );
        for k in 1..6 {
            let chunks = chunk_phrases(&words, k, &PhraseStarters::default());
            assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= k));
            let flat: Vec<String> = chunks.concat();
            assert_eq!(flat, words);
        }
    }

    #[test]
    fn test_ends_with_boundary_punctuation() {
        for token in ["end.", "what?", "wow!", "list:", "a;", "b,", "c—", "d–", "e-"] {
            assert!(ends_with_boundary_punctuation(token), "{token}");
        }
        assert!(!ends_with_boundary_punctuation("plain"));
        assert!(!ends_with_boundary_punctuation("quote\""));
        assert!(!ends_with_boundary_punctuation(""));
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("(The,"), "the");
        assert_eq!(normalize_token("Über"), "über");
        assert_eq!(normalize_token("..."), "");
    }

    #[test]
    fn test_strategy_from_smart() {
        assert_eq!(ChunkStrategy::from_smart(true), ChunkStrategy::Phrase);
        assert_eq!(ChunkStrategy::from_smart(false), ChunkStrategy::Mechanical);
        assert_eq!(ChunkStrategy::Phrase.to_string(), "Phrase");
    }
}
