use std::collections::BTreeSet;

use crate::{
    error::{Result, SearchError},
    server::token::{is_valid_token, tokenize},
};

/// Case-sensitive set of words excluded from documents and queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build from a sequence of words
    /// Empty entries are skipped, duplicates collapse.
    /// Fails on the first word with a control character.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_token(word) {
                return Err(SearchError::InvalidToken(word.to_string()));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from space-delimited text
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(tokenize(text)?)
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_and_sequence_constructors_agree() {
        let from_text = StopWordSet::from_text("and  with and").unwrap();
        let from_seq = StopWordSet::new(["with", "", "and"]).unwrap();
        assert_eq!(from_text, from_seq);
        assert_eq!(from_text.len(), 2);
        assert!(from_text.contains("and"));
        assert!(!from_text.contains("And"));
    }

    #[test]
    fn invalid_stop_word_aborts_construction() {
        assert!(matches!(
            StopWordSet::from_text("and or n\x12t from"),
            Err(SearchError::InvalidToken(_))
        ));
        assert!(matches!(
            StopWordSet::new(vec!["and".to_string(), "n\x12t".to_string()]),
            Err(SearchError::InvalidToken(_))
        ));
    }

    #[test]
    fn empty_text_gives_empty_set() {
        let set = StopWordSet::from_text("").unwrap();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
