//! Tuning constants for the search server.
//!
//! These are compile-time constants; the binary exposes runtime options
//! through its command line arguments.

/// Maximum number of documents returned by a ranked search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Two relevances closer than this are tied and ordered by rating instead.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Number of requests remembered by [`RequestQueue`](crate::RequestQueue).
///
/// One request per minute over a day.
pub const REQUEST_HISTORY_CAPACITY: usize = 1440;

/// Default page size used by the binary when paginating search results.
pub const DEFAULT_PAGE_SIZE: usize = 2;
