use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::{Result, SearchError};

/// Token delimiter
/// Only the plain space splits tokens; other whitespace is token content.
pub const TOKEN_DELIMITER: char = ' ';

/// Check that a token contains no control characters
///
/// # Arguments
/// * `token` - token to check
///
/// # Returns
/// * `bool` - false if any char is below `' '`
#[inline]
pub fn is_valid_token(token: &str) -> bool {
    !token.chars().any(|c| c < ' ')
}

/// Split text into validated tokens
///
/// Empty segments produced by consecutive delimiters are dropped.
/// Fails on the first invalid token; no partial list is returned.
///
/// # Arguments
/// * `text` - raw text
///
/// # Returns
/// * `Result<Vec<&str>>` - tokens borrowed from `text`
pub fn tokenize(text: &str) -> Result<Vec<&str>> {
    text.split(TOKEN_DELIMITER)
        .filter(|token| !token.is_empty())
        .map(|token| {
            if is_valid_token(token) {
                Ok(token)
            } else {
                Err(SearchError::InvalidToken(token.to_string()))
            }
        })
        .collect()
}

/// TermFrequency
/// Counts term occurrences inside one document.
/// It manages:
/// - the count of occurrences of each term
/// - the total number of terms in the document
///
/// Used as base data for the normalized TF stored in the index.
///
/// # Examples
/// ```
/// use tf_idf_search_server::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["cat", "in", "cat"]);
/// assert_eq!(freq.term_count("cat"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermFrequency {
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// Termの追加
impl TermFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        match self.term_count.get_mut(term) {
            Some(count) => *count += 1,
            None => {
                self.term_count.insert(term.to_string(), 1);
            }
        }
        self.total_term_count += 1;
        self
    }

    /// Add multiple terms
    ///
    /// # Arguments
    /// * `terms` - slice of terms
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

/// 参照系
impl TermFrequency {
    /// Occurrence count of `term` (0 if absent)
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of terms added
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Unique terms in first-seen order
    #[inline]
    pub fn term_set(&self) -> Vec<&str> {
        self.term_count.keys().map(String::as_str).collect()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_term_count == 0
    }

    /// Normalized term frequency `count / total` per term
    ///
    /// # Returns
    /// * `BTreeMap<String, f64>` - term -> tf, empty when no term was added
    pub fn normalized(&self) -> BTreeMap<String, f64> {
        if self.total_term_count == 0 {
            return BTreeMap::new();
        }
        let total = self.total_term_count as f64;
        self.term_count
            .iter()
            .map(|(term, &count)| (term.clone(), count as f64 / total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_space_and_drops_empty_segments() {
        let tokens = tokenize("  cat in  the city ").unwrap();
        assert_eq!(tokens, vec!["cat", "in", "the", "city"]);
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("    ").unwrap().is_empty());
    }

    #[test]
    fn tab_is_a_control_character_not_a_delimiter() {
        assert_eq!(
            tokenize("cat\tdog"),
            Err(SearchError::InvalidToken("cat\tdog".to_string()))
        );
    }

    #[test]
    fn invalid_token_fails_whole_text() {
        let err = tokenize("big dog star\x12ling").unwrap_err();
        assert_eq!(err, SearchError::InvalidToken("star\x12ling".to_string()));
    }

    #[test]
    fn non_ascii_tokens_are_valid() {
        let tokens = tokenize("пушистый кот").unwrap();
        assert_eq!(tokens, vec!["пушистый", "кот"]);
    }

    #[test]
    fn normalized_frequencies_sum_to_one() {
        let mut freq = TermFrequency::new();
        freq.add_terms(&["a", "b", "a", "c", "a", "b", "d"]);
        assert_eq!(freq.term_set(), vec!["a", "b", "c", "d"]);
        let tf = freq.normalized();
        assert_eq!(tf.len(), 4);
        assert!((tf["a"] - 3.0 / 7.0).abs() < 1e-12);
        let sum: f64 = tf.values().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_frequency_normalizes_to_empty_map() {
        let freq = TermFrequency::new();
        assert!(freq.is_empty());
        assert!(freq.normalized().is_empty());
    }
}
