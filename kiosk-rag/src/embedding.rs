//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The intent hint passed to the embedding service.
///
/// Chunks are embedded as documents at indexing time and queries as queries
/// at search time; the model is the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    RetrievalDocument,
    RetrievalQuery,
}

/// A provider that generates vector embeddings from text input.
///
/// # Example
///
/// ```rust,ignore
/// use kiosk_rag::{EmbeddingProvider, TaskType};
///
/// let embedding = provider.embed("hello world", TaskType::RetrievalQuery).await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str, task_type: TaskType) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
