//! Data types for documents, chunk metadata, and search results.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of source file a [`Document`] was read from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Txt,
    Md,
}

impl DocumentType {
    /// All recognized types, in the order the loader scans for them.
    pub const ALL: [DocumentType; 3] = [DocumentType::Pdf, DocumentType::Txt, DocumentType::Md];

    /// Map a file extension (without the dot, case-insensitive) to a type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Txt),
            "md" => Some(Self::Md),
            _ => None,
        }
    }

    /// Determine the type of a path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Txt => "txt",
            Self::Md => "md",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source document loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// File name of the source, used as the document identifier.
    pub id: String,
    /// Path the document was read from.
    pub source: PathBuf,
    /// Extracted text, or a placeholder message if extraction failed.
    pub text: String,
    /// The source file type.
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Number of chunks the text was split into at indexing time.
    #[serde(default)]
    pub chunk_count: usize,
}

impl Document {
    /// Text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Metadata for one indexed chunk.
///
/// The record at position `i` of a store describes the vector at position `i`
/// of its index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkRecord {
    /// Position of the parent document in the store's document list.
    pub doc_idx: usize,
    /// Identifier of the parent document.
    pub doc_id: String,
    /// Type of the parent document.
    pub doc_type: DocumentType,
    /// Position of the chunk within its document.
    pub chunk_idx: usize,
    /// The chunk text.
    pub text: String,
}

/// A retrieved chunk with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResult {
    /// Identifier of the document the chunk came from.
    pub id: String,
    pub chunk_idx: usize,
    pub text: String,
    /// Squared L2 distance to the query (lower is more relevant).
    pub score: f32,
}
