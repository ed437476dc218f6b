use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::collections::HashSet;

use super::normalize_token;

static PHRASES_DIR: Dir = include_dir!("src/phrases");

pub const DEFAULT_LANGUAGE: &str = "english";

#[derive(Deserialize)]
struct PhraseStartersFile {
    name: String,
    words: Vec<String>,
}

/// Function words that tend to open a new phrase (articles, conjunctions,
/// subordinators, prepositions, relative pronouns) for one language.
///
/// Entries are stored normalized, see [`normalize_token`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseStarters {
    pub name: String,
    words: HashSet<String>,
}

impl PhraseStarters {
    pub fn new<I, S>(name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_token(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            name: name.into(),
            words,
        }
    }

    /// No phrase starters at all; phrase chunking then only splits on
    /// punctuation and size.
    pub fn empty() -> Self {
        Self::new("none", Vec::<String>::new())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let file: PhraseStartersFile = serde_json::from_str(json)?;
        Ok(Self::new(file.name, file.words))
    }

    /// Loads one of the lists bundled into the binary.
    pub fn bundled(language: &str) -> Option<Self> {
        let file = PHRASES_DIR.get_file(format!("{}.json", language.to_lowercase()))?;
        let json = file.contents_utf8()?;

        match Self::from_json(json) {
            Ok(starters) => Some(starters),
            Err(err) => {
                log::warn!("bundled phrase list {language} is malformed: {err}");
                None
            }
        }
    }

    /// Names of all bundled languages, sorted.
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = PHRASES_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .filter_map(|stem| stem.to_str())
            .map(str::to_owned)
            .collect();
        names.sort();
        names
    }

    /// True if the token, once case-folded and stripped of punctuation,
    /// is a phrase starter.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(&normalize_token(token))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for PhraseStarters {
    fn default() -> Self {
        Self::bundled(DEFAULT_LANGUAGE).unwrap_or_else(Self::empty)
    }
}
