//! Error types for the `kiosk-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while generating text.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index or its on-disk artifacts.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The component that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// One of the two vector store artifacts is missing.
    #[error("Vector store not found at {}", path.display())]
    StoreNotFound {
        /// The artifact that could not be found.
        path: PathBuf,
    },

    /// Text could not be extracted from a source file.
    #[error("Failed to extract text from {}: {message}", path.display())]
    ExtractionError {
        /// The file being read.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the RAG pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// A registered function rejected its arguments or failed while running.
    #[error("Tool error: {0}")]
    ToolError(String),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Metadata (de)serialization failure.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
