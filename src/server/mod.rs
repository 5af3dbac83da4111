pub mod document;
pub mod evaluate;
pub mod index;
pub mod stop_words;
pub mod store;
pub mod token;

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::Result,
    server::{
        document::{compute_average_rating, DocumentData, DocumentId, DocumentStatus},
        index::InvertedIndex,
        stop_words::StopWordSet,
        store::{DocumentIds, DocumentStore},
        token::{tokenize, TermFrequency},
    },
};

/// Execution mode of the hot paths (search, removal, matching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionPolicy {
    /// Run on the calling thread
    #[default]
    Sequential,
    /// Split independent per-document / per-term work over the rayon pool
    /// Final sorting and truncation still run sequentially.
    Parallel,
}

static EMPTY_WORD_FREQS: BTreeMap<String, f64> = BTreeMap::new();

/// In-memory TF-IDF search server
///
/// Owns the stop words, the inverted index and the document store.
/// Reads take `&self` and mutations take `&mut self`, so sharing one
/// instance across threads needs an external lock (e.g. `RwLock`).
#[derive(Debug, Clone, Default)]
pub struct SearchServer {
    stop_words: StopWordSet,
    index: InvertedIndex,
    documents: DocumentStore,
}

impl SearchServer {
    /// Create a server from a sequence of stop words
    /// Fails if any stop word contains a control character.
    pub fn new<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWordSet::new(stop_words)?))
    }

    /// Create a server from space-delimited stop words
    pub fn from_stop_words_text(text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWordSet::from_text(text)?))
    }

    pub fn with_stop_words(stop_words: StopWordSet) -> Self {
        Self {
            stop_words,
            index: InvertedIndex::new(),
            documents: DocumentStore::new(),
        }
    }

    pub fn stop_words(&self) -> &StopWordSet {
        &self.stop_words
    }

    /// Add a document
    ///
    /// # Arguments
    /// * `id` - non-negative, unused id
    /// * `text` - space-delimited text
    /// * `status` - moderation status
    /// * `ratings` - user ratings, averaged with saturating arithmetic
    ///
    /// # Errors
    /// `InvalidId`, `DuplicateId`, or `InvalidToken` from tokenization.
    /// Nothing is modified on error.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        self.documents.check_new_id(id)?;
        let words = self.split_into_words_no_stop(text)?;

        let mut freq = TermFrequency::new();
        freq.add_terms(&words);
        // 空文書は postings を持たない
        let word_freqs = freq.normalized();
        for (term, &tf) in &word_freqs {
            self.index.insert(term, id, tf);
        }

        let rating = compute_average_rating(ratings);
        debug!(id, terms = word_freqs.len(), rating, %status, "document added");
        self.documents.insert(id, DocumentData { rating, status, word_freqs })
    }

    /// Remove a document; absent ids are ignored
    pub fn remove_document(&mut self, id: DocumentId) {
        self.remove_document_with_policy(ExecutionPolicy::Sequential, id);
    }

    /// Remove a document with the given execution policy
    ///
    /// Postings are purged first (emptied terms pruned), the document
    /// record is deleted last.
    pub fn remove_document_with_policy(&mut self, policy: ExecutionPolicy, id: DocumentId) {
        let Some(data) = self.documents.get(id) else {
            return;
        };
        match policy {
            ExecutionPolicy::Sequential => self
                .index
                .remove_document(id, data.word_freqs.keys().map(String::as_str)),
            ExecutionPolicy::Parallel => self.index.par_remove_document(id, &data.word_freqs),
        }
        self.documents.remove(id);
        debug!(id, ?policy, "document removed");
    }

    /// Term frequencies of a document
    /// Returns an empty map for unknown ids.
    pub fn get_word_frequencies(&self, id: DocumentId) -> &BTreeMap<String, f64> {
        self.documents
            .get(id)
            .map_or(&EMPTY_WORD_FREQS, |data| &data.word_freqs)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn contains_document(&self, id: DocumentId) -> bool {
        self.documents.contains(id)
    }

    /// Ids in insertion order
    pub fn document_ids(&self) -> DocumentIds<'_> {
        self.documents.ids()
    }

    /// Number of distinct indexed terms
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = tokenize(text)?;
        words.retain(|word| !self.stop_words.contains(word));
        Ok(words)
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocumentId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}
