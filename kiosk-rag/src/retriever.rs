//! Query-time retrieval: embed the query, search the index, resolve chunks.

use std::sync::Arc;

use tracing::debug;

use crate::document::QueryResult;
use crate::embedding::{EmbeddingProvider, TaskType};
use crate::error::Result;
use crate::observer::{StatusObserver, StatusReporter};
use crate::store::VectorStore;

/// Searches a loaded [`VectorStore`] for chunks relevant to a query.
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    status: StatusReporter,
}

impl Retriever {
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder, status: StatusReporter::silent() }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.status = StatusReporter::new(observer);
        self
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Return up to `top_k` chunks ordered by ascending distance to `query`.
    ///
    /// Fewer than `top_k` results come back when the store holds fewer chunks;
    /// any `top_k` is accepted.
    ///
    /// # Errors
    ///
    /// Propagates query embedding failures and dimension mismatches between
    /// the query embedding and the index.
    pub async fn search_documents(&self, query: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        self.status.report(format!("Searching documents for: {query}"));

        let query_vector = self.embedder.embed(query, TaskType::RetrievalQuery).await?;
        let hits = self.store.search(&query_vector, top_k.min(self.store.len()))?;

        let results: Vec<QueryResult> = hits
            .iter()
            .filter_map(|(position, distance)| {
                let record = self.store.chunks().get(position)?;
                Some(QueryResult {
                    id: record.doc_id.clone(),
                    chunk_idx: record.chunk_idx,
                    text: record.text.clone(),
                    score: distance,
                })
            })
            .collect();

        debug!(top_k, result_count = results.len(), "search completed");
        self.status.report(format!("Found {} relevant chunks", results.len()));
        Ok(results)
    }
}
