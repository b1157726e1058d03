//! Document discovery and text extraction.
//!
//! The loader never drops a recognized file: when extraction fails the
//! document keeps its slot and carries a placeholder text that names the
//! failure, so indexing proceeds for the remaining files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::document::{Document, DocumentType};
use crate::error::{RagError, Result};

/// List the recognized files directly inside `dir`.
///
/// PDFs come first, then plain text, then Markdown; each group is sorted by
/// path. Files with other extensions are ignored. A missing directory yields
/// an empty list.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] if `dir` exists but is not a directory.
pub fn discover_documents(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        warn!(dir = %dir.display(), "document directory does not exist");
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(RagError::ConfigError(format!("{} is not a directory", dir.display())));
    }

    let mut files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let doc_type = DocumentType::from_path(entry.path())?;
            Some((doc_type, entry.into_path()))
        })
        .collect::<Vec<_>>();

    files.sort_by(|(type_a, path_a), (type_b, path_b)| {
        type_rank(*type_a).cmp(&type_rank(*type_b)).then_with(|| path_a.cmp(path_b))
    });
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

fn type_rank(doc_type: DocumentType) -> usize {
    DocumentType::ALL.iter().position(|t| *t == doc_type).unwrap_or(usize::MAX)
}

/// Load a single file into a [`Document`].
///
/// Returns `None` for unrecognized extensions. Extraction failures produce a
/// document whose text is `"Error processing document: <reason>"`.
pub fn load_document(path: impl AsRef<Path>) -> Option<Document> {
    let path = path.as_ref();
    let doc_type = DocumentType::from_path(path)?;
    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let text = match extract_text(path, doc_type) {
        Ok(text) => text,
        Err(e) => {
            warn!(document.id = %id, error = %e, "failed to extract document text");
            format!("Error processing document: {e}")
        }
    };

    debug!(document.id = %id, doc_type = %doc_type, chars = text.len(), "loaded document");
    Some(Document { id, source: path.to_path_buf(), text, doc_type, chunk_count: 0 })
}

/// Load every recognized file directly inside `dir`.
///
/// # Errors
///
/// Only fails when `dir` is not a directory; per-file failures become
/// placeholder documents.
pub fn load_documents(dir: impl AsRef<Path>) -> Result<Vec<Document>> {
    let documents: Vec<Document> =
        discover_documents(&dir)?.iter().filter_map(load_document).collect();
    info!(dir = %dir.as_ref().display(), document_count = documents.len(), "loaded documents");
    Ok(documents)
}

fn extract_text(path: &Path, doc_type: DocumentType) -> Result<String> {
    match doc_type {
        DocumentType::Pdf => extract_pdf_text(path),
        DocumentType::Txt | DocumentType::Md => {
            let bytes = fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Concatenate the text of every page, each followed by exactly one newline.
fn extract_pdf_text(path: &Path) -> Result<String> {
    let to_error = |e: lopdf::Error| RagError::ExtractionError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let pdf = lopdf::Document::load(path).map_err(to_error)?;
    let mut text = String::new();
    for page_number in pdf.get_pages().keys() {
        let page_text = pdf.extract_text(&[*page_number]).map_err(to_error)?;
        text.push_str(page_text.trim_end_matches(['\r', '\n']));
        text.push('\n');
    }
    Ok(text)
}
