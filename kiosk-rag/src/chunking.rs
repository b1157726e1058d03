//! Document chunking.
//!
//! Text is split into consecutive, non-overlapping windows of a fixed number
//! of characters. Windows ignore word and sentence boundaries, so a chunk may
//! end mid-word.

/// A strategy for splitting document text into chunks.
pub trait Chunker: Send + Sync {
    /// Split `text` into chunks. Empty text yields no chunks.
    fn chunk(&self, text: &str) -> Vec<String>;
}

/// Splits text into fixed-size character windows without overlap.
///
/// # Example
///
/// ```rust
/// use kiosk_rag::{Chunker, FixedSizeChunker};
///
/// let chunker = FixedSizeChunker::new(4);
/// assert_eq!(chunker.chunk("abcdefghij"), vec!["abcd", "efgh", "ij"]);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker` producing windows of `chunk_size` characters.
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for FixedSizeChunker {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        chunk_text(text, self.chunk_size)
    }
}

/// Split `text` into windows of `chunk_size` characters; the last may be shorter.
///
/// Counts Unicode scalar values, never splitting a character. A `chunk_size`
/// of zero is treated as one window covering the whole text.
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if chunk_size == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::with_capacity(text.len() / chunk_size + 1);
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            chunks.push(text[start..offset].to_string());
            start = offset;
            count = 0;
        }
        count += 1;
    }
    chunks.push(text[start..].to_string());

    chunks
}
