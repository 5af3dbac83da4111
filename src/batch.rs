use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::SearchError,
    server::{
        document::{DocumentId, DocumentStatus},
        SearchServer,
    },
};

/// Serializable input record for [`add_documents`]
///
/// ```json
/// {"id": 1, "text": "funny pet", "status": "actual", "ratings": [7, 2, 7]}
/// ```
/// `status` defaults to `actual` and `ratings` to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

impl DocumentRecord {
    pub fn new(id: DocumentId, text: impl Into<String>, status: DocumentStatus, ratings: Vec<i32>) -> Self {
        Self { id, text: text.into(), status, ratings }
    }
}

/// Outcome of a batch insertion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: Vec<DocumentId>,
    pub failed: Vec<(DocumentId, SearchError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Add records one by one, skipping the ones the server rejects
pub fn add_documents<I>(server: &mut SearchServer, records: I) -> BatchReport
where
    I: IntoIterator<Item = DocumentRecord>,
{
    let mut report = BatchReport::default();
    for record in records {
        match server.add_document(record.id, &record.text, record.status, &record.ratings) {
            Ok(()) => report.added.push(record.id),
            Err(err) => {
                warn!(id = record.id, error = %err, "failed to add document");
                report.failed.push((record.id, err));
            }
        }
    }
    report
}
