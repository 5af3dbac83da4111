use std::collections::BTreeSet;

use tracing::info;

use crate::server::{document::DocumentId, SearchServer};

/// Remove documents whose term set repeats an earlier document
///
/// Documents are visited in insertion order; the first document with a
/// given set of terms is kept and every later one is removed. Term
/// frequencies and stop words are ignored.
///
/// # Returns
/// * Removed ids, in visiting order.
pub fn remove_duplicates(server: &mut SearchServer) -> Vec<DocumentId> {
    let mut originals: BTreeSet<Vec<&str>> = BTreeSet::new();
    let mut duplicates = Vec::new();
    for id in server.document_ids() {
        // BTreeMap のキーは昇順なので Vec のままで集合として比較できる
        let terms: Vec<&str> = server.get_word_frequencies(id).keys().map(String::as_str).collect();
        if !originals.insert(terms) {
            info!(id, "found duplicate document");
            duplicates.push(id);
        }
    }
    drop(originals);

    for &id in &duplicates {
        server.remove_document(id);
    }
    duplicates
}
