use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters that survive corpus parsing: ASCII letters, digits, underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Distinct lowercase words grouped by length. Words under key `k` are
/// lexicographically sorted and have length exactly `k`; no word appears
/// under more than one key. Serializes as a JSON object with string-encoded
/// integer keys — the `words.json` corpus format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordDictionary(BTreeMap<usize, Vec<String>>);

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn words_of(&self, length: usize) -> Option<&[String]> {
        self.0.get(&length).map(Vec::as_slice)
    }

    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.values().flatten().map(String::as_str)
    }

    pub fn word_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        let mut seen = HashSet::new();
        for (&key, words) in &self.0 {
            if key == 0 {
                return Err(CorpusError::ZeroLengthKey);
            }
            if words.is_empty() {
                return Err(CorpusError::EmptyLengthKey { key });
            }
            for word in words {
                if word.is_empty()
                    || word.chars().any(|c| !is_word_char(c) || c.is_ascii_uppercase())
                {
                    return Err(CorpusError::MalformedWord { word: word.clone() });
                }
                if word.len() != key {
                    return Err(CorpusError::LengthMismatch {
                        word: word.clone(),
                        key,
                    });
                }
                if !seen.insert(word) {
                    return Err(CorpusError::DuplicateWord { word: word.clone() });
                }
            }
            if !words.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(CorpusError::UnsortedWords { key });
            }
        }
        Ok(())
    }
}

impl From<BTreeMap<usize, Vec<String>>> for WordDictionary {
    fn from(groups: BTreeMap<usize, Vec<String>>) -> Self {
        WordDictionary(groups)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CorpusError {
    #[error("length key 0 is not allowed")]
    ZeroLengthKey,
    #[error("length key {key} has no words")]
    EmptyLengthKey { key: usize },
    #[error("{word:?} is not a lowercase word-character token")]
    MalformedWord { word: String },
    #[error("{word:?} filed under length key {key}")]
    LengthMismatch { word: String, key: usize },
    #[error("{word:?} appears under more than one entry")]
    DuplicateWord { word: String },
    #[error("words under length key {key} are not sorted")]
    UnsortedWords { key: usize },
}
