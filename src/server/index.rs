use std::collections::BTreeMap;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::server::document::DocumentId;

/// Postings of one term: document id -> normalized term frequency
pub type Postings = BTreeMap<DocumentId, f64>;

/// Inverted index mapping terms to their postings
///
/// A term is present iff at least one live document contains it;
/// postings that become empty are pruned together with their term.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    /// term -> postings ordered by document id
    postings: IndexMap<Box<str>, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `freq` to the posting of (`term`, `id`)
    pub fn insert(&mut self, term: &str, id: DocumentId, freq: f64) {
        let postings = self.postings.entry(Box::from(term)).or_default();
        *postings.entry(id).or_insert(0.0) += freq;
    }

    /// Postings of `term`, if any live document contains it
    #[inline]
    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.postings.get(term)
    }

    /// Number of documents containing `term`
    #[inline]
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, BTreeMap::len)
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Check if the posting of `term` holds `id`
    #[inline]
    pub fn contains(&self, term: &str, id: DocumentId) -> bool {
        self.postings
            .get(term)
            .is_some_and(|postings| postings.contains_key(&id))
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(|term| &**term)
    }

    /// Remove the postings of `id` for the given terms
    /// Terms whose postings become empty are removed.
    pub fn remove_document<'t, I>(&mut self, id: DocumentId, terms: I)
    where
        I: IntoIterator<Item = &'t str>,
    {
        for term in terms {
            let emptied = match self.postings.get_mut(term) {
                Some(postings) => {
                    postings.remove(&id);
                    postings.is_empty()
                }
                None => false,
            };
            if emptied {
                self.postings.swap_remove(term);
            }
        }
    }

    /// Parallel variant of [`remove_document`](Self::remove_document)
    ///
    /// Erasure is partitioned over the term buckets; every bucket is
    /// independent so no cross-term synchronization is needed. Empty
    /// terms are pruned after all workers have joined.
    pub fn par_remove_document(&mut self, id: DocumentId, terms: &BTreeMap<String, f64>) {
        let emptied = self
            .postings
            .par_iter_mut()
            .filter(|(term, _)| terms.contains_key::<str>(term))
            .map(|(_, postings)| {
                postings.remove(&id);
                postings.is_empty()
            })
            .filter(|&is_empty| is_empty)
            .count();
        if emptied > 0 {
            self.postings.retain(|_, postings| !postings.is_empty());
        }
    }
}
