//! Builds a [`VectorStore`] from documents: chunk, embed, index.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::document::{ChunkRecord, Document};
use crate::embedding::{EmbeddingProvider, TaskType};
use crate::error::{RagError, Result};
use crate::index::FlatL2Index;
use crate::loader::load_documents;
use crate::observer::{StatusObserver, StatusReporter};
use crate::store::VectorStore;

/// Turns a document set into a searchable [`VectorStore`].
///
/// Chunks are embedded one at a time. A chunk whose embedding fails, or
/// whose length differs from the provider's declared dimensions, is
/// logged and left out of the index, while its document keeps the full
/// `chunk_count`; the index may therefore hold fewer chunks for a document
/// than its `chunk_count` reports.
///
/// # Example
///
/// ```rust,ignore
/// let indexer = Indexer::new(Arc::new(FixedSizeChunker::new(1000)), embedder);
/// let store = indexer.build_from_dir("data/sample_docs").await?;
/// store.save("data/vector_store")?;
/// ```
pub struct Indexer {
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    status: StatusReporter,
}

impl Indexer {
    pub fn new(chunker: Arc<dyn Chunker>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { chunker, embedder, status: StatusReporter::silent() }
    }

    /// Attach an observer that receives per-document progress.
    pub fn with_observer(mut self, observer: Arc<dyn StatusObserver>) -> Self {
        self.status = StatusReporter::new(observer);
        self
    }

    /// Load every recognized file in `dir` and index it.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub async fn build_from_dir(&self, dir: impl AsRef<Path>) -> Result<VectorStore> {
        self.status.report(format!("Loading documents from {}", dir.as_ref().display()));
        let documents = load_documents(dir)?;
        self.build(documents).await
    }

    /// Chunk and embed `documents` and assemble the store.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if no chunk could be embedded.
    pub async fn build(&self, mut documents: Vec<Document>) -> Result<VectorStore> {
        let total = documents.len();
        let mut index = FlatL2Index::new(self.embedder.dimensions());
        let mut chunks_info = Vec::new();

        for (doc_idx, document) in documents.iter_mut().enumerate() {
            self.status.report(format!(
                "Creating embeddings for {} ({}/{total})",
                document.id,
                doc_idx + 1
            ));

            let chunks = self.chunker.chunk(&document.text);
            document.chunk_count = chunks.len();

            for (chunk_idx, text) in chunks.into_iter().enumerate() {
                let embedding = match self.embedder.embed(&text, TaskType::RetrievalDocument).await
                {
                    Ok(embedding) => embedding,
                    Err(e) => {
                        warn!(document.id = %document.id, chunk_idx, error = %e, "skipping chunk");
                        continue;
                    }
                };

                if let Err(e) = index.add(&embedding) {
                    warn!(document.id = %document.id, chunk_idx, error = %e, "skipping chunk");
                    continue;
                }

                chunks_info.push(ChunkRecord {
                    doc_idx,
                    doc_id: document.id.clone(),
                    doc_type: document.doc_type,
                    chunk_idx,
                    text,
                });
            }
        }

        if chunks_info.is_empty() {
            return Err(RagError::PipelineError(
                "no documents or embeddings found; add documents to the data directory".into(),
            ));
        }

        info!(document_count = total, chunk_count = chunks_info.len(), "built vector store");
        self.status.report(format!("Total chunks with embeddings: {}", chunks_info.len()));
        VectorStore::new(index, documents, chunks_info)
    }
}
