use std::fmt;

use rayon::prelude::*;

use crate::{
    error::Result,
    server::{
        document::{DocumentId, DocumentStatus},
        ExecutionPolicy, SearchServer,
    },
};

/// Matched plus-terms of one document, formatted for display
///
/// `{ document_id = 1, status = 0, words = cat city}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub id: DocumentId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

impl MatchReport {
    pub fn new(id: DocumentId, words: Vec<String>, status: DocumentStatus) -> Self {
        Self { id, words, status }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, status = {}, words =",
            self.id, self.status as i32
        )?;
        for word in &self.words {
            write!(f, " {}", word)?;
        }
        write!(f, "}}")
    }
}

impl SearchServer {
    /// Plus-terms of the query that occur in a document
    ///
    /// # Returns
    /// * `(words, status)` - sorted, deduplicated plus-terms and the
    ///   document status. `words` is empty if any minus-term occurs.
    ///
    /// # Errors
    /// Query parse errors first, then `UnknownDocument` for absent ids.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        self.match_document_with_policy(ExecutionPolicy::Sequential, raw_query, id)
    }

    pub fn match_document_with_policy(
        &self,
        policy: ExecutionPolicy,
        raw_query: &str,
        id: DocumentId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = self.parse_query(raw_query)?;
        let status = self.documents.status(id)?;

        if query.minus_terms.iter().any(|&term| self.index.contains(term, id)) {
            return Ok((Vec::new(), status));
        }

        // plus_terms は BTreeSet なので昇順・重複なし
        let words = match policy {
            ExecutionPolicy::Sequential => query
                .plus_terms
                .iter()
                .filter(|&&term| self.index.contains(term, id))
                .map(|&term| term.to_string())
                .collect(),
            ExecutionPolicy::Parallel => query
                .plus_terms
                .par_iter()
                .filter(|&&term| self.index.contains(term, id))
                .map(|&term| term.to_string())
                .collect(),
        };
        Ok((words, status))
    }

    /// [`match_document`](Self::match_document) packed into a [`MatchReport`]
    pub fn match_report(&self, raw_query: &str, id: DocumentId) -> Result<MatchReport> {
        let (words, status) = self.match_document(raw_query, id)?;
        Ok(MatchReport::new(id, words, status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;

    fn server() -> SearchServer {
        let mut server = SearchServer::from_stop_words_text("").unwrap();
        server.add_document(1, "cat in the city", DocumentStatus::Actual, &[1]).unwrap();
        server.add_document(2, "dog in the village", DocumentStatus::Irrelevant, &[2]).unwrap();
        server.add_document(3, "tiger in the city", DocumentStatus::Banned, &[3]).unwrap();
        server.add_document(4, "bird in the village", DocumentStatus::Removed, &[4]).unwrap();
        server
    }

    #[test]
    fn returns_sorted_plus_terms_and_status() {
        let server = server();
        let (words, status) = server.match_document("city cat cat -tiger", 1).unwrap();
        assert_eq!(words, vec!["cat", "city"]);
        assert_eq!(status, DocumentStatus::Actual);

        let (words, status) = server.match_document("dog in the village", 2).unwrap();
        assert_eq!(words, vec!["dog", "in", "the", "village"]);
        assert_eq!(status, DocumentStatus::Irrelevant);
    }

    #[test]
    fn minus_term_empties_the_match() {
        let server = server();
        let (words, status) = server.match_document("tiger -city", 3).unwrap();
        assert!(words.is_empty());
        assert_eq!(status, DocumentStatus::Banned);
    }

    #[test]
    fn stop_words_never_match() {
        let mut server = SearchServer::from_stop_words_text("in the").unwrap();
        server.add_document(1, "cat in the city", DocumentStatus::Actual, &[]).unwrap();
        let (words, _) = server.match_document("cat in the", 1).unwrap();
        assert_eq!(words, vec!["cat"]);
    }

    #[test]
    fn errors() {
        let server = server();
        assert_eq!(server.match_document("cat", 42), Err(SearchError::UnknownDocument(42)));
        // 解析エラーが先
        assert!(matches!(server.match_document("cat --dog", 42), Err(SearchError::MalformedMinusTerm(_))));
        assert!(matches!(server.match_document("cat -", 1), Err(SearchError::MalformedMinusTerm(_))));
    }

    #[test]
    fn parallel_matches_sequential() {
        let server = server();
        for (query, id) in [("cat city in -tiger", 1), ("tiger -city", 3), ("bird the village", 4), ("nothing", 2)] {
            assert_eq!(
                server.match_document_with_policy(ExecutionPolicy::Sequential, query, id),
                server.match_document_with_policy(ExecutionPolicy::Parallel, query, id),
            );
        }
    }

    #[test]
    fn report_display() {
        let server = server();
        let report = server.match_report("cat city", 1).unwrap();
        assert_eq!(report.to_string(), "{ document_id = 1, status = 0, words = cat city}");
        let report = server.match_report("village -bird", 4).unwrap();
        assert_eq!(report.to_string(), "{ document_id = 4, status = 3, words =}");
    }
}
