//! Error types for the search server.

use thiserror::Error;

use crate::server::document::DocumentId;

/// Errors surfaced by the indexing and retrieval operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A token contains a control character (code point below `' '`)
    #[error("invalid token {0:?}: control characters are not allowed")]
    InvalidToken(String),
    /// A bare `-` or a term starting with `--`
    #[error("malformed minus term {0:?}")]
    MalformedMinusTerm(String),
    /// Document ids must be non-negative
    #[error("invalid document id {0}: ids must be non-negative")]
    InvalidId(DocumentId),
    /// The id is already present in the store
    #[error("document {0} already exists")]
    DuplicateId(DocumentId),
    /// The id is not present in the store
    #[error("document {0} not found")]
    UnknownDocument(DocumentId),
}

/// Failed to parse a [`DocumentStatus`](crate::DocumentStatus) from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown document status {0:?} (expected actual, irrelevant, banned or removed)")]
pub struct ParseStatusError(pub String);

pub type Result<T> = std::result::Result<T, SearchError>;
