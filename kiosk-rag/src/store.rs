//! The persisted vector store: a flat index plus positionally aligned metadata.
//!
//! A store lives on disk as two companion files sharing a path prefix:
//! `<prefix>.index` holds the binary vector index and `<prefix>.pkl` holds the
//! `{documents, chunks_info}` metadata as JSON. Both are written and read
//! together; a store is never updated in place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::{ChunkRecord, Document};
use crate::error::{RagError, Result};
use crate::index::{FlatL2Index, SearchHits};

/// File extension of the binary index artifact.
pub const INDEX_EXTENSION: &str = "index";

/// File extension of the metadata artifact.
pub const METADATA_EXTENSION: &str = "pkl";

/// Locations of the two artifacts that make up a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub index: PathBuf,
    pub metadata: PathBuf,
}

impl StorePaths {
    /// Derive both artifact paths from a prefix such as `data/vector_store`.
    pub fn from_prefix(prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref().as_os_str();
        let with_extension = |ext: &str| {
            let mut path = prefix.to_os_string();
            path.push(".");
            path.push(ext);
            PathBuf::from(path)
        };
        Self { index: with_extension(INDEX_EXTENSION), metadata: with_extension(METADATA_EXTENSION) }
    }
}

/// Serialized form of the metadata artifact.
#[derive(Debug, Deserialize)]
struct StoreMetadata {
    documents: Vec<Document>,
    chunks_info: Vec<ChunkRecord>,
}

#[derive(Serialize)]
struct StoreMetadataRef<'a> {
    documents: &'a [Document],
    chunks_info: &'a [ChunkRecord],
}

/// An index and the documents and chunk records it was built from.
///
/// `chunks()[i]` describes the vector at position `i` of `index()`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStore {
    index: FlatL2Index,
    documents: Vec<Document>,
    chunks: Vec<ChunkRecord>,
}

impl VectorStore {
    /// Assemble a store, checking that the index and chunk records line up.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if the vector count differs from
    /// the number of chunk records.
    pub fn new(index: FlatL2Index, documents: Vec<Document>, chunks: Vec<ChunkRecord>) -> Result<Self> {
        if index.len() != chunks.len() {
            return Err(RagError::VectorStoreError {
                backend: "VectorStore".to_string(),
                message: format!(
                    "index holds {} vectors but metadata describes {} chunks",
                    index.len(),
                    chunks.len()
                ),
            });
        }
        Ok(Self { index, documents, chunks })
    }

    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Look up a document by its identifier.
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Search the index for the `k` vectors nearest to `query`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<SearchHits> {
        self.index.search(query, k)
    }

    /// Write both artifacts under `prefix`, creating the parent directory.
    pub fn save(&self, prefix: impl AsRef<Path>) -> Result<StorePaths> {
        let paths = StorePaths::from_prefix(&prefix);
        if let Some(parent) = paths.index.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        self.index.write_to(BufWriter::new(File::create(&paths.index)?))?;

        let metadata = StoreMetadataRef { documents: &self.documents, chunks_info: &self.chunks };
        let mut writer = BufWriter::new(File::create(&paths.metadata)?);
        serde_json::to_writer(&mut writer, &metadata)?;
        writer.flush()?;

        info!(
            index = %paths.index.display(),
            metadata = %paths.metadata.display(),
            chunk_count = self.chunks.len(),
            "saved vector store"
        );
        Ok(paths)
    }

    /// Load both artifacts from `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreNotFound`] if either artifact is missing, and
    /// [`RagError::VectorStoreError`] if they are corrupt or misaligned.
    pub fn load(prefix: impl AsRef<Path>) -> Result<Self> {
        let paths = StorePaths::from_prefix(&prefix);
        for path in [&paths.index, &paths.metadata] {
            if !path.is_file() {
                return Err(RagError::StoreNotFound { path: path.clone() });
            }
        }

        let index = FlatL2Index::read_from(BufReader::new(File::open(&paths.index)?))?;
        let metadata: StoreMetadata =
            serde_json::from_reader(BufReader::new(File::open(&paths.metadata)?))?;

        let store = Self::new(index, metadata.documents, metadata.chunks_info)?;
        info!(
            chunk_count = store.chunks.len(),
            document_count = store.documents.len(),
            "loaded vector store"
        );
        Ok(store)
    }
}
