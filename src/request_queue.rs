use std::collections::VecDeque;

use crate::{
    config::REQUEST_HISTORY_CAPACITY,
    error::Result,
    server::{
        document::{Document, DocumentId, DocumentStatus},
        SearchServer,
    },
};

#[derive(Debug, Clone, Copy)]
struct RequestRecord {
    no_result: bool,
}

/// Sliding window over the most recent search requests
///
/// Forwards searches to a borrowed [`SearchServer`] and remembers, for the
/// last [`REQUEST_HISTORY_CAPACITY`] requests, whether each came back empty.
#[derive(Debug)]
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<RequestRecord>,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self {
            server,
            requests: VecDeque::with_capacity(REQUEST_HISTORY_CAPACITY),
            no_result_count: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents(raw_query);
        self.record(result)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self.server.find_top_documents_by_status(raw_query, status);
        self.record(result)
    }

    pub fn add_find_request_with<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let result = self.server.find_top_documents_with(raw_query, predicate);
        self.record(result)
    }

    /// Requests in the window that returned nothing
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    /// Requests currently in the window
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    // 失敗したリクエストは記録しない
    fn record(&mut self, result: Result<Vec<Document>>) -> Result<Vec<Document>> {
        let documents = result?;
        if self.requests.len() == REQUEST_HISTORY_CAPACITY {
            if let Some(evicted) = self.requests.pop_front() {
                if evicted.no_result {
                    self.no_result_count -= 1;
                }
            }
        }
        let no_result = documents.is_empty();
        if no_result {
            self.no_result_count += 1;
        }
        self.requests.push_back(RequestRecord { no_result });
        Ok(documents)
    }
}
