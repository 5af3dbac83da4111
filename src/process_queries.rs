use rayon::prelude::*;

use crate::{
    error::Result,
    server::{document::Document, SearchServer},
};

/// Run every query through [`SearchServer::find_top_documents`] on the rayon pool
///
/// # Returns
/// * One result list per query, in input order.
///
/// # Errors
/// The first failing query (in input order) aborts the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    // 並列に全件評価してから入力順に集約する
    let results: Vec<Result<Vec<Document>>> = queries
        .par_iter()
        .map(|query| server.find_top_documents(query.as_ref()))
        .collect();
    results.into_iter().collect()
}

/// [`process_queries`] flattened into one list, query order kept
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?.into_iter().flatten().collect())
}
