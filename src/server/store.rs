use std::iter::Copied;

use indexmap::{map::Keys, IndexMap};

use crate::{
    error::{Result, SearchError},
    server::document::{DocumentData, DocumentId, DocumentStatus},
};

/// Iterator over stored ids in insertion order
pub type DocumentIds<'a> = Copied<Keys<'a, DocumentId, DocumentData>>;

/// Stored documents keyed by id, iterated in insertion order
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: IndexMap<DocumentId, DocumentData>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an id for insertion
    /// Fails if negative or already present.
    pub fn check_new_id(&self, id: DocumentId) -> Result<()> {
        if id < 0 {
            return Err(SearchError::InvalidId(id));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::DuplicateId(id));
        }
        Ok(())
    }

    /// Insert a validated document at the end of the insertion order
    pub fn insert(&mut self, id: DocumentId, data: DocumentData) -> Result<()> {
        self.check_new_id(id)?;
        self.documents.insert(id, data);
        Ok(())
    }

    /// Remove a document, keeping the order of the others
    pub fn remove(&mut self, id: DocumentId) -> Option<DocumentData> {
        self.documents.shift_remove(&id)
    }

    #[inline]
    pub fn get(&self, id: DocumentId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Status of a stored document
    pub fn status(&self, id: DocumentId) -> Result<DocumentStatus> {
        self.get(id)
            .map(|data| data.status)
            .ok_or(SearchError::UnknownDocument(id))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> DocumentIds<'_> {
        self.documents.keys().copied()
    }
}
