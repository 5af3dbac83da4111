use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::trace;

use crate::{
    config::{MAX_RESULT_DOCUMENT_COUNT, RELEVANCE_EPSILON},
    error::Result,
    server::{
        document::{Document, DocumentId, DocumentStatus},
        evaluate::query::Query,
        index::Postings,
        ExecutionPolicy, SearchServer,
    },
    utils::sort::stable_sort_by,
};

/// Ranking order of search results
///
/// Higher relevance first; relevances closer than [`RELEVANCE_EPSILON`]
/// count as equal and fall back to higher rating first.
/// Not transitive, so it is only fed to [`stable_sort_by`].
#[inline]
pub fn ranks_before(lhs: &Document, rhs: &Document) -> bool {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        lhs.rating > rhs.rating
    } else {
        lhs.relevance > rhs.relevance
    }
}

impl SearchServer {
    /// Top documents with status `Actual`
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    /// Top documents with the given status
    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_with(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Top documents accepted by `predicate(id, status, rating)`
    /// Runs on the calling thread, so `predicate` need not be `Sync`.
    pub fn find_top_documents_with<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = self.parse_query(raw_query)?;
        let matched = self.find_all_documents(&query, &predicate);
        Ok(Self::select_top(&query, matched, ExecutionPolicy::Sequential))
    }

    /// Rank documents against a query
    ///
    /// # Arguments
    /// * `policy` - sequential or rayon-parallel candidate scoring
    /// * `raw_query` - space-delimited query, `-term` excludes
    /// * `predicate` - `(id, status, rating) -> keep`
    ///
    /// # Returns
    /// * At most [`MAX_RESULT_DOCUMENT_COUNT`] documents, best first.
    ///   Both policies return the same list.
    ///
    /// # Errors
    /// Query parse errors; nothing is searched in that case.
    pub fn find_top_documents_with_policy<P>(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        match policy {
            ExecutionPolicy::Sequential => self.find_top_documents_with(raw_query, predicate),
            ExecutionPolicy::Parallel => {
                let query = self.parse_query(raw_query)?;
                let matched = self.par_find_all_documents(&query, &predicate);
                Ok(Self::select_top(&query, matched, policy))
            }
        }
    }

    /// `ln(N / df)` of a term
    /// 0.0 for terms no document contains.
    pub fn inverse_document_freq(&self, term: &str) -> f64 {
        let df = self.index.document_frequency(term);
        if df == 0 {
            return 0.0;
        }
        (self.documents.len() as f64 / df as f64).ln()
    }

    /// Every document matching the query, unsorted
    ///
    /// Candidates come from the plus-term postings in ascending id order.
    /// Each candidate sums `tf * idf` over the plus-terms in sorted term
    /// order, so the parallel path yields bit-identical relevances.
    pub fn find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let weighted = self.weighted_postings(query);
        candidates(&weighted)
            .into_iter()
            .filter_map(|id| self.score_candidate(query, &weighted, predicate, id))
            .collect()
    }

    /// Parallel variant of [`find_all_documents`](Self::find_all_documents)
    pub fn par_find_all_documents<P>(&self, query: &Query<'_>, predicate: &P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let weighted = self.weighted_postings(query);
        candidates(&weighted)
            .into_par_iter()
            .filter_map(|id| self.score_candidate(query, &weighted, predicate, id))
            .collect()
    }

    /// Postings and idf of every indexed plus-term, in sorted term order
    fn weighted_postings(&self, query: &Query<'_>) -> Vec<(&Postings, f64)> {
        query
            .plus_terms
            .iter()
            .filter_map(|&term| {
                self.index
                    .postings(term)
                    .map(|postings| (postings, self.inverse_document_freq(term)))
            })
            .collect()
    }

    fn score_candidate<P>(
        &self,
        query: &Query<'_>,
        weighted: &[(&Postings, f64)],
        predicate: &P,
        id: DocumentId,
    ) -> Option<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        if query.minus_terms.iter().any(|&term| self.index.contains(term, id)) {
            return None;
        }
        let data = self.documents.get(id)?;
        if !predicate(id, data.status, data.rating) {
            return None;
        }
        let relevance = weighted
            .iter()
            .filter_map(|(postings, idf)| postings.get(&id).map(|tf| tf * idf))
            .sum();
        Some(Document::new(id, relevance, data.rating))
    }

    // ソートと切り詰めは常に逐次
    fn select_top(query: &Query<'_>, mut matched: Vec<Document>, policy: ExecutionPolicy) -> Vec<Document> {
        trace!(
            plus = query.plus_terms.len(),
            minus = query.minus_terms.len(),
            matched = matched.len(),
            ?policy,
            "scored candidates"
        );
        stable_sort_by(&mut matched, ranks_before);
        matched.truncate(MAX_RESULT_DOCUMENT_COUNT);
        matched
    }
}

/// Ids present in any of the postings, ascending
fn candidates(weighted: &[(&Postings, f64)]) -> BTreeSet<DocumentId> {
    weighted
        .iter()
        .flat_map(|(postings, _)| postings.keys().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn status_server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("").unwrap();
        server.add_document(11, "orange cat in the big city", DocumentStatus::Actual, &[100]).unwrap();
        server.add_document(22, "clever cat in the small village", DocumentStatus::Actual, &[1]).unwrap();
        server.add_document(33, "black cat in the dark room", DocumentStatus::Irrelevant, &[1, 2, 3]).unwrap();
        server.add_document(44, "yellow cat rides on the small bird", DocumentStatus::Banned, &[-1, -2, -3]).unwrap();
        server.add_document(55, "pink raptor runs from orange cat", DocumentStatus::Removed, &[-1, 1]).unwrap();
        server
    }

    fn relevance_server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("in on from with the").unwrap();
        server.add_document(11, "orange cat in the big city", DocumentStatus::Actual, &[]).unwrap();
        server.add_document(22, "big pink cat in the small box", DocumentStatus::Actual, &[1]).unwrap();
        server.add_document(33, "black cat in the dark room", DocumentStatus::Actual, &[1, 2, 3]).unwrap();
        server.add_document(44, "yellow cat rides on the red cat with another small cat", DocumentStatus::Actual, &[-1, -2, -3]).unwrap();
        server.add_document(55, "big pink raptor runs from small orange cat", DocumentStatus::Actual, &[-1, 1]).unwrap();
        server
    }

    fn ids(documents: &[Document]) -> Vec<DocumentId> {
        documents.iter().map(|document| document.id).collect()
    }

    #[test]
    fn default_search_keeps_actual_only() {
        let server = status_server();
        let mut found = ids(&server.find_top_documents("cat").unwrap());
        found.sort();
        assert_eq!(found, vec![11, 22]);
    }

    #[test]
    fn status_filter() {
        let server = status_server();
        for (status, id) in [
            (DocumentStatus::Banned, 44),
            (DocumentStatus::Irrelevant, 33),
            (DocumentStatus::Removed, 55),
        ] {
            assert_eq!(ids(&server.find_top_documents_by_status("cat", status).unwrap()), vec![id]);
        }
    }

    #[test]
    fn predicate_filter() {
        let server = status_server();
        let even = server.find_top_documents_with("cat", |id, _, _| id % 2 == 0).unwrap();
        assert_eq!(even.len(), 2);
        assert!(even.iter().all(|document| document.id % 2 == 0));

        let positive = server.find_top_documents_with("cat", |_, _, rating| rating > 0).unwrap();
        assert_eq!(positive.len(), 3);

        assert_eq!(server.find_top_documents_with("cat", |_, _, _| true).unwrap().len(), 5);
        assert!(server.find_top_documents_with("cat", |_, _, _| false).unwrap().is_empty());
        assert!(server.find_top_documents_with("dog", |_, _, _| true).unwrap().is_empty());
    }

    #[test]
    fn relevance_is_tf_idf() {
        let server = relevance_server();
        let ln5 = 5.0_f64.ln();

        // cat は全文書に出現するので idf = 0
        for document in server.find_top_documents("cat").unwrap() {
            assert_eq!(document.relevance, 0.0);
        }

        let found = server.find_top_documents("black raptor cat").unwrap();
        assert_eq!(found[0].id, 33);
        assert!((found[0].relevance - ln5 / 4.0).abs() < 1e-6);
        assert_eq!(found[1].id, 55);
        assert!((found[1].relevance - ln5 / 7.0).abs() < 1e-6);
        assert_eq!(found.iter().filter(|document| document.relevance == 0.0).count(), 3);

        let found = server.find_top_documents("orange cat city").unwrap();
        assert_eq!(found[0].id, 11);
        assert!((found[0].relevance - ((2.5_f64).ln() / 4.0 + ln5 / 4.0)).abs() < 1e-6);
        assert_eq!(found[1].id, 55);
        assert!((found[1].relevance - (2.5_f64).ln() / 7.0).abs() < 1e-6);
    }

    #[test]
    fn ties_fall_back_to_rating() {
        let server = relevance_server();
        let found = server.find_top_documents("cat").unwrap();
        // 同点なら id 昇順のまま
        assert_eq!(ids(&found), vec![33, 22, 11, 55, 44]);
        let ratings: Vec<i32> = found.iter().map(|document| document.rating).collect();
        assert_eq!(ratings, vec![2, 1, 0, 0, -2]);
    }

    #[test]
    fn near_equal_relevance_ranks_by_rating() {
        let lower = Document::new(1, 0.5, 9);
        let higher = Document::new(2, 0.5 + 5e-7, 1);
        assert!(ranks_before(&lower, &higher));
        assert!(!ranks_before(&higher, &lower));

        // 差が epsilon を超えれば relevance 順
        let far = Document::new(3, 0.5 + 2e-6, 1);
        assert!(ranks_before(&far, &lower));
        assert!(!ranks_before(&lower, &far));

        let mut documents = vec![higher, far, lower];
        stable_sort_by(&mut documents, ranks_before);
        assert_eq!(ids(&documents), vec![3, 1, 2]);
    }

    #[test]
    fn sequential_predicate_need_not_be_sync() {
        use std::{cell::Cell, rc::Rc};

        let server = status_server();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let found = server
            .find_top_documents_with("cat", move |_, _, rating| {
                counter.set(counter.get() + 1);
                rating > 0
            })
            .unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn minus_terms_exclude_documents() {
        let server = relevance_server();
        let found = ids(&server.find_top_documents("cat -pink -black").unwrap());
        assert_eq!(found.len(), 2);
        assert!(!found.contains(&22) && !found.contains(&33) && !found.contains(&55));
        assert!(server.find_top_documents("cat -cat").unwrap().is_empty());
        assert!(server.find_top_documents("-cat").unwrap().is_empty());
    }

    #[test]
    fn results_are_capped() {
        let mut server = SearchServer::from_stop_words_text("").unwrap();
        for id in 0..20 {
            server.add_document(id, "word", DocumentStatus::Actual, &[id]).unwrap();
        }
        let found = server.find_top_documents("word").unwrap();
        assert_eq!(found.len(), MAX_RESULT_DOCUMENT_COUNT);
        assert_eq!(ids(&found), vec![19, 18, 17, 16, 15]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let server = relevance_server();
        for query in ["cat", "black raptor cat", "big pink -raptor", "orange cat city -box", "nothing"] {
            let sequential = server
                .find_top_documents_with_policy(ExecutionPolicy::Sequential, query, |_, _, _| true)
                .unwrap();
            let parallel = server
                .find_top_documents_with_policy(ExecutionPolicy::Parallel, query, |_, _, _| true)
                .unwrap();
            assert_eq!(sequential, parallel, "query {query:?}");
        }
    }

    #[test]
    fn bad_query_fails_before_search() {
        let server = relevance_server();
        assert!(matches!(server.find_top_documents("cat --dog"), Err(SearchError::MalformedMinusTerm(_))));
        assert!(matches!(server.find_top_documents("cat -"), Err(SearchError::MalformedMinusTerm(_))));
        assert!(matches!(server.find_top_documents("ca\x12t"), Err(SearchError::InvalidToken(_))));
    }

    #[test]
    fn idf_of_unknown_term_is_zero() {
        let server = relevance_server();
        assert_eq!(server.inverse_document_freq("unicorn"), 0.0);
        assert!((server.inverse_document_freq("black") - 5.0_f64.ln()).abs() < 1e-12);
    }
}
