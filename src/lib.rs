//! This crate is an in-memory full-text search server ranking documents by TF-IDF.

pub mod batch;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod paginator;
pub mod process_queries;
pub mod request_queue;
pub mod server;
pub mod utils;

/// Search Server
/// The top-level struct of this crate.
/// It indexes space-delimited documents and answers ranked queries.
///
/// Internally, it holds:
/// - The stop word set fixed at construction
/// - An inverted index (term -> document id -> normalized term frequency)
/// - The document store (rating, status and term frequencies per id)
///
/// Queries are space-delimited terms; `-term` excludes every document
/// containing `term`. Results are ranked by `sum(tf * ln(N / df))`, ties
/// broken by rating, and capped at five.
///
/// # Thread Safety
/// `Send + Sync`. Searches take `&self`, mutations take `&mut self`.
/// Hot paths accept an `ExecutionPolicy` to run on the rayon pool.
pub use server::SearchServer;

/// Execution mode for search, removal and matching
/// `Sequential` and `Parallel` always produce identical results.
pub use server::ExecutionPolicy;

/// Ranked search result
/// (id, relevance, rating), recomputed on every query.
///
/// # Serialization
/// Supported.
pub use server::document::Document;

/// Document moderation status
/// `Actual`, `Irrelevant`, `Banned`, `Removed`.
///
/// # Serialization
/// Supported. Lowercase names, uppercase accepted on input.
pub use server::document::{DocumentId, DocumentStatus};

/// Term Frequency structure
/// Counts term occurrences within one document and normalizes them
/// into the per-document TF map the index stores.
pub use server::token::TermFrequency;

/// Stop word set
/// Terms ignored both when indexing and when querying.
pub use server::stop_words::StopWordSet;

/// Parsed query and its parser
pub use server::evaluate::query::{Query, QueryParser};

/// Formatted result of `SearchServer::match_document`
pub use server::evaluate::matching::MatchReport;

/// Error type of every fallible operation
pub use error::{ParseStatusError, Result, SearchError};

/// Sliding window of recent requests counting empty results
pub use request_queue::RequestQueue;

/// Fixed-size pages over search results
pub use paginator::{paginate, Page, Paginator};

/// Parallel batch querying
pub use process_queries::{process_queries, process_queries_joined};

/// Duplicate document removal by term set
pub use duplicates::remove_duplicates;

/// Batch document insertion
pub use batch::{add_documents, BatchReport, DocumentRecord};
